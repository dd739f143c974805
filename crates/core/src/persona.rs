//! Persona system — tone profiles for the assistant's replies.
//!
//! A persona changes only how the final reply is phrased. It is folded
//! into the system prompt at the Responding boundary and never feeds
//! into tool selection or tool results.

use serde::{Deserialize, Serialize};

/// The recognized reply-tone profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Relaxed, enthusiastic, slang-friendly movie buddy.
    #[default]
    Casual,
    /// Polished, analytical, slightly poetic film critic.
    Critic,
}

impl Persona {
    /// All personas, for CLI listings and config validation.
    pub fn all() -> &'static [Persona] {
        &[Persona::Casual, Persona::Critic]
    }

    /// The style block appended to the base system prompt.
    ///
    /// Phrasing guidance only — factual content and tool results must
    /// pass through untouched.
    pub fn style_instruction(&self) -> &'static str {
        match self {
            Persona::Casual => {
                "Write like an enthusiastic movie buddy: relaxed, warm, a little \
                 slangy, generous with excitement. Keep facts and tool results \
                 exactly as given — only the delivery is casual."
            }
            Persona::Critic => {
                "Write like a professional film critic: polished, analytical, \
                 measured, with an eye for craft. Keep facts and tool results \
                 exactly as given — only the register is elevated."
            }
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Persona::Casual => write!(f, "casual"),
            Persona::Critic => write!(f, "critic"),
        }
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "casual" => Ok(Persona::Casual),
            "critic" => Ok(Persona::Critic),
            other => Err(format!(
                "unknown persona '{other}' (expected one of: casual, critic)"
            )),
        }
    }
}
