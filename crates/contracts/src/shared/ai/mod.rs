//! Assistant chat of the analytics page: wire types and message rendering.

pub mod render;

use serde::{Deserialize, Serialize};

/// Messages sent as history in general mode
pub const HISTORY_LIMIT: usize = 12;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub const GREETING: &str = "Hola 👋. Puedes preguntarme por ventas, productos, clientes, comparativas por fechas, o lo que necesites.";
pub const RESET_GREETING: &str = "Chat reiniciado. Pregúntame cualquier cosa 🙂";
pub const EMPTY_ANSWER: &str = "(sin respuesta)";

/// Ready-made questions shown as chips under the chat: (caption, question)
pub const SUGGESTED_QUESTIONS: [(&str, &str); 3] = [
    ("Producto que más crece", "¿Qué producto creció más en el rango?"),
    (
        "Detectar picos",
        "¿Hay días con picos anómalos de ventas? Describe posibles causas.",
    ),
    ("Subir AOV", "Dame 3 acciones para subir el ticket medio (AOV)."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Failure shown inside the conversation
    pub fn error(message: &str) -> Self {
        Self::assistant(format!("Error: {}", message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    /// Questions answered with the metrics of the selected range
    #[default]
    Analytics,
    /// Free conversation with history
    General,
}

impl ChatMode {
    pub fn label(self) -> &'static str {
        match self {
            ChatMode::Analytics => "Modo Tendencias",
            ChatMode::General => "Modo General",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ChatMode::Analytics => "Pregunta sobre las métricas… (comparativas, productos, etc.)",
            ChatMode::General => "Pregunta cualquier cosa…",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ChatMode::Analytics => {
                "Modo Tendencias: la IA responde con el contexto del rango seleccionado."
            }
            ChatMode::General => "Modo General: conversación libre.",
        }
    }
}

/// `POST /ai/ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl AskRequest {
    /// Empty dates are sent as null
    pub fn new(question: &str, date_from: &str, date_to: &str) -> Self {
        let opt = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
        Self {
            question: question.trim().to_string(),
            date_from: opt(date_from),
            date_to: opt(date_to),
        }
    }
}

/// `POST /ai/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub mode: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// General-mode request carrying the last `HISTORY_LIMIT` messages
    pub fn general(history: &[ChatMessage]) -> Self {
        let start = history.len().saturating_sub(HISTORY_LIMIT);
        Self {
            mode: "general".to_string(),
            temperature: DEFAULT_TEMPERATURE,
            messages: history[start..].to_vec(),
        }
    }
}

/// Response of both chat endpoints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiAnswer {
    #[serde(default)]
    pub answer: Option<String>,
}

impl AiAnswer {
    pub fn text(&self) -> String {
        self.answer
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(EMPTY_ANSWER)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_general_request_keeps_last_twelve() {
        let history: Vec<ChatMessage> = (0..15)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("q{}", i))
                } else {
                    ChatMessage::assistant(format!("a{}", i))
                }
            })
            .collect();
        let req = ChatRequest::general(&history);
        assert_eq!(req.messages.len(), HISTORY_LIMIT);
        assert_eq!(req.messages[0].content, "a3");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["mode"], json!("general"));
        assert_eq!(body["messages"][0]["role"], json!("assistant"));
    }

    #[test]
    fn test_ask_request_nulls() {
        let body = serde_json::to_value(AskRequest::new(" ¿Ventas? ", "", "2024-05-31")).unwrap();
        assert_eq!(
            body,
            json!({"question": "¿Ventas?", "date_from": null, "date_to": "2024-05-31"})
        );
    }

    #[test]
    fn test_answer_fallback() {
        let a: AiAnswer = serde_json::from_str("{}").unwrap();
        assert_eq!(a.text(), EMPTY_ANSWER);
        assert_eq!(ChatMessage::error("500").content, "Error: 500");
    }
}
