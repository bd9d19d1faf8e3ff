use eora_core::traits::LlmClient;
use eora_core::Result;

/// How the model is asked to cite retrieved sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationStyle {
    /// `[1]` markers followed by an `Источники:` list. Used in the terminal.
    #[default]
    Numbered,
    /// `[1](url)` inline links. Used in chat, where links are clickable.
    Linked,
}

impl CitationStyle {
    fn format_hint(self) -> &'static str {
        match self {
            Self::Numbered => "[номер]",
            Self::Linked => "[номер](url)",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Numbered => "[1]",
            Self::Linked => "[1](url)",
        }
    }
}

/// Company-voice answering prompt with one worked example.
pub fn build_prompt(context: &str, question: &str, style: CitationStyle) -> String {
    let hint = style.format_hint();
    let marker = style.marker();
    let mut prompt = format!(
        "Ты — представитель компании EORA. Отвечай на вопросы от первого лица множественного числа:
\"Мы разработали...\", \"Наша команда внедрила...\", \"В нашем проекте...\".

Контекст для ответа:
{context}

Вопрос: {question}
Ответ должен быть кратким и содержать ссылки на источники в формате {hint}.
Пример:

Вопрос: \"Какие технологии вы использовали в проекте для Lamoda?\"
Ответ:
\"Мы разработали систему поиска похожей одежды на основе трансформенных моделей для изображений и API для поиска {marker}.
Наша команда также создала удобную систему разметки, которую можно применять в других проектах {marker}.\"
"
    );
    if style == CitationStyle::Numbered {
        prompt.push_str("Источники:\n[1] - url\n");
    }
    prompt
}

/// Sends the assembled prompt and returns the model's text untouched.
pub async fn answer(
    llm: &dyn LlmClient,
    context: &str,
    question: &str,
    token: &str,
    style: CitationStyle,
) -> Result<String> {
    llm.get_answer(&build_prompt(context, question, style), token).await
}
