use std::io::{BufRead, Write};

use tracing::error;

use eora_rag::Answerer;

const RULE_WIDTH: usize = 50;
const EXIT_WORDS: &[&str] = &["quit", "exit", "выход"];

/// Interactive question loop. Returns on an exit word or end of input.
pub async fn run_repl<R: BufRead, W: Write>(mut input: R, mut output: W, answerer: &dyn Answerer) -> anyhow::Result<()> {
    let banner_rule = "=".repeat(RULE_WIDTH);
    writeln!(output, "\n{banner_rule}")?;
    writeln!(output, "RAG QA System (для выхода введите 'quit' или 'exit')")?;
    writeln!(output, "{banner_rule}\n")?;

    let mut line = String::new();
    loop {
        write!(output, "[Вопрос] ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();

        if is_exit_word(query) {
            writeln!(output, "Завершение работы системы...")?;
            break;
        }
        if query.is_empty() {
            writeln!(output, "Пожалуйста, введите вопрос.")?;
            continue;
        }

        match answerer.ask(query).await {
            Ok(answer) => writeln!(output, "\n[Ответ] {answer}")?,
            Err(err) => {
                error!(error = %err, "failed to answer question");
                writeln!(output, "\n[Ошибка] {err}")?;
            }
        }
        writeln!(output, "{}\n", "-".repeat(RULE_WIDTH))?;
    }
    output.flush()?;
    Ok(())
}

fn is_exit_word(query: &str) -> bool {
    let lowered = query.to_lowercase();
    EXIT_WORDS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_ignore_case() {
        assert!(is_exit_word("QUIT"));
        assert!(is_exit_word("Выход"));
        assert!(!is_exit_word("exit please"));
    }
}
