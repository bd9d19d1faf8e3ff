/// Instructions that turn a cleaned case-study page into sectioned Markdown.
///
/// The `###` headings requested here are what the chunker later splits on.
pub const RESTRUCTURE_PROMPT: &str = "Анализируй предоставленный текст и выделяй только важные моменты, сохраняя смысловую структуру. Действуй по следующим правилам:
1. Удаляй:
- Все контактные данные (телефоны, email, адреса)
- Технические блоки (JSON, HTML-теги, коды форм)
- Уведомления о cookies и политиках конфиденциальности
- Повторяющиеся элементы навигации и меню
- Рекламные призывы (\"Получить консультацию\" и подобные)

2. Сохраняй:
- Заголовки и подзаголовки
- Проблемы и решения
- Технологии и инструменты
- Ключевые преимущества
- Команду проекта (если есть)
- Уникальные особенности проекта

3. Форматируй результат:
- Используй Markdown-разметку
- Заголовки выделяй через ###
- Списки оформляй через дефисы
- Сохраняй оригинальную структуру разделов
- Удаляй лишние переносы строк

4. Особые указания:
- Если встречается описание кейса - сохрани полную структуру (Проблема/Решение/Результат)
- Технические детали оставляй только если они существенны
- Названия инструментов/технологий выделяй курсивом

Пример структуры вывода:

### Проект: Название проекта/кейса

### Проблема
- Описание проблемы
- Кто сталкивается

### Решение
- Какое решение предложено
- Основные компоненты системы

### Технологии
- *PyTorch* для машинного обучения
- Собственный инструмент *ORI MarkUp*

### Команда
- Имя (роль)


Теперь обработай следующий текст:
";

pub fn restructure_prompt(clean_text: &str) -> String {
    format!("{RESTRUCTURE_PROMPT}{clean_text}\n")
}
