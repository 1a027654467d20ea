// src/error.rs
use thiserror::Error;

use crate::analysis::ResultId;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The generator answered with something that is not a report object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("generator request failed: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("could not extract text from '{name}': {source}")]
    Extraction {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("report {0} not found or not a surgical report")]
    ReportNotFound(ResultId),
}

impl AnalysisError {
    /// Classifies a generator failure. A reply that could not be decoded stays
    /// a malformed response; anything else is a transport failure.
    pub fn from_generator(err: anyhow::Error) -> Self {
        match err.downcast::<AnalysisError>() {
            Ok(AnalysisError::MalformedResponse(detail)) => AnalysisError::MalformedResponse(detail),
            Ok(other) => AnalysisError::Transport(other.into()),
            Err(err) => match err.downcast_ref::<serde_json::Error>() {
                Some(decode) => AnalysisError::MalformedResponse(decode.to_string()),
                None => AnalysisError::Transport(err),
            },
        }
    }

    /// Message shown to the user and stored as the state's error.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::MalformedResponse(_) => {
                "A IA retornou um formato de dados inesperado. Tente novamente ou verifique a transcrição."
            }
            AnalysisError::Transport(_) | AnalysisError::Extraction { .. } => {
                "Ocorreu um erro de comunicação com a IA. Verifique sua conexão e tente novamente."
            }
            AnalysisError::ReportNotFound(_) => "Relatório original não encontrado ou inválido.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_and_transport_share_message() {
        let transport = AnalysisError::Transport(anyhow::anyhow!("timeout"));
        let extraction = AnalysisError::Extraction {
            name: "call.pdf".into(),
            source: anyhow::anyhow!("encrypted"),
        };
        assert_eq!(transport.user_message(), extraction.user_message());
        assert!(extraction.to_string().contains("call.pdf"));
    }

    #[test]
    fn generator_decode_failures_stay_malformed() {
        let wrapped = anyhow::Error::new(AnalysisError::MalformedResponse("not json".into()));
        assert!(matches!(
            AnalysisError::from_generator(wrapped),
            AnalysisError::MalformedResponse(d) if d == "not json"
        ));

        let decode = serde_json::from_str::<serde_json::Value>("Desculpe").unwrap_err();
        assert!(matches!(
            AnalysisError::from_generator(decode.into()),
            AnalysisError::MalformedResponse(_)
        ));

        assert!(matches!(
            AnalysisError::from_generator(anyhow::anyhow!("quota exceeded")),
            AnalysisError::Transport(_)
        ));
    }
}
