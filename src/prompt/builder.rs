// Classification and discovery prompt templates.

use serde_json::Value;

use crate::config::DEFAULT_SUBJECT;
use crate::taxonomy::Taxonomy;

/// Marker placed before every comment in the discovery corpus so the model
/// can tell where one comment ends and the next begins.
pub const COMMENT_DELIMITER: &str = "INICIO_DE_COMENTARIO:";

/// What the corpus is about, phrased to follow "comentários ... sobre".
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub subject: String,
}

impl Default for PromptContext {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

impl PromptContext {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Render the per-comment classification prompt.
///
/// The model is asked for exactly one JSON object `{"Topics": [...]}` with
/// one to three labels taken from `taxonomy`, and nothing else.
pub fn classification_prompt(context: &PromptContext, comment: &str, taxonomy: &Taxonomy) -> String {
    format!(
        "Você é um especialista em análise de discurso e redes sociais.\n\
         Os dados que você trabalha são comentários de redes sociais sobre {subject}.\n\
         \n\
         Sua tarefa é atribuir, no mínimo, um e, no máximo, três tópicos ao comentário em <comentario>.\n\
         Utilize apenas os tópicos da lista de tópicos em <topicos>.\n\
         \n\
         Retorne apenas o(s) tópico(s) atribuídos no seguinte formato JSON:\n\
         {{\"Topics\": [\"tópico 1\", \"tópico 2\", \"tópico 3\"]}}\n\
         \n\
         Não acrescente nada à sua resposta, apenas o conteúdo do JSON.\n\
         \n\
         <comentario>{comment}</comentario>\n\
         <topicos>{topics}</topicos>\n",
        subject = context.subject,
        comment = comment,
        topics = topic_list(taxonomy),
    )
}

/// Render the labels as a list of JSON strings: `["a", "b"]`.
///
/// Labels go through as written, accents and combining marks included.
/// Only JSON's own escapes (quotes, backslashes, control characters) apply.
fn topic_list(taxonomy: &Taxonomy) -> String {
    let quoted: Vec<String> = taxonomy
        .labels()
        .iter()
        .map(|label| Value::from(label.as_str()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Render the corpus-wide topic discovery prompt.
///
/// Every comment is placed on its own line behind [`COMMENT_DELIMITER`].
/// The model is asked for an inductive list of short (at most three word)
/// topics, returned as a bare list of strings.
pub fn discovery_prompt(context: &PromptContext, comments: &[String]) -> String {
    let mut corpus = String::with_capacity(
        comments
            .iter()
            .map(|c| c.len() + COMMENT_DELIMITER.len() + 2)
            .sum(),
    );
    for comment in comments {
        corpus.push_str(COMMENT_DELIMITER);
        corpus.push(' ');
        corpus.push_str(comment);
        corpus.push('\n');
    }

    format!(
        "Você é um especialista em análise de discurso e redes sociais.\n\
         O corpus são comentários de redes sociais sobre {subject}.\n\
         O corpus está em <corpus>, onde cada comentário começa em {delimiter}\n\
         \n\
         Sua tarefa é fazer a modelagem de tópicos e retornar os tópicos que mais se destacam.\n\
         Utilize uma abordagem indutiva (leitura exploratória para identificar os tópicos principais).\n\
         Os tópicos devem ser concisos (no máximo 3 palavras).\n\
         Seja criterioso na escolha dos tópicos, pois eles devem refletir com precisão \
         os argumentos e temas presentes no corpus.\n\
         Retorne apenas a lista dos tópicos como uma lista de strings em Python.\n\
         \n\
         <corpus>\n{corpus}</corpus>\n",
        subject = context.subject,
        delimiter = COMMENT_DELIMITER,
        corpus = corpus,
    )
}

/// Rough token count of a prompt (four characters per token).
pub fn estimate_tokens(prompt: &str) -> usize {
    prompt.chars().count() / 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_is_deterministic() {
        let context = PromptContext::default();
        let taxonomy = Taxonomy::default();
        let a = classification_prompt(&context, "A Braskem tem culpa", &taxonomy);
        let b = classification_prompt(&context, "A Braskem tem culpa", &taxonomy);
        assert_eq!(a, b);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        assert_eq!(estimate_tokens("abcd"), 1);
        // 8 chars, 10 bytes
        assert_eq!(estimate_tokens("ãõãõabcd"), 2);
        assert_eq!(estimate_tokens(""), 0);
    }
}
