use crate::core::Result;
use serde::Serialize;

/// Gateway result tagged with how the transaction may proceed
///
/// `Sync` means the outcome is final and the transaction can transition
/// now. `Async` means the gateway will settle the outcome later (buyer
/// redirect, background process), so the transaction waits.
#[derive(Debug)]
pub enum Completion<T> {
    Sync(Result<T>),
    Async(Result<T>),
}

impl<T> Completion<T> {
    pub fn is_sync(&self) -> bool {
        matches!(self, Completion::Sync(_))
    }

    pub fn is_success(&self) -> bool {
        self.response().is_ok()
    }

    pub fn response(&self) -> &Result<T> {
        match self {
            Completion::Sync(response) | Completion::Async(response) => response,
        }
    }

    pub fn into_response(self) -> Result<T> {
        match self {
            Completion::Sync(response) | Completion::Async(response) => response,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Completion<U> {
        match self {
            Completion::Sync(response) => Completion::Sync(response.map(f)),
            Completion::Async(response) => Completion::Async(response.map(f)),
        }
    }
}

/// JSON rendering of a completion
#[derive(Debug, Serialize)]
pub struct CompletionBody<T> {
    pub sync: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl<T> From<Completion<T>> for CompletionBody<T> {
    fn from(completion: Completion<T>) -> Self {
        let sync = completion.is_sync();
        match completion.into_response() {
            Ok(data) => CompletionBody {
                sync,
                success: true,
                data: Some(data),
                error_msg: None,
            },
            Err(e) => CompletionBody {
                sync,
                success: false,
                data: None,
                error_msg: Some(e.message()),
            },
        }
    }
}
