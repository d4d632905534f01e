//! OAuth redirect markers and the page effects the client asks its host to
//! perform.

use std::collections::HashMap;

use url::Url;

pub const CALLBACK_PARAM: &str = "auth";
pub const CALLBACK_MESSAGE_PARAM: &str = "message";
const CALLBACK_SUCCESS: &str = "success";
const CALLBACK_ERROR: &str = "error";

/// Something the presentation layer must do to the browser page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    /// Rewrite the visible address in place, no network navigation.
    ReplaceAddress(Url),
    /// Full-page navigation. The current page instance is finished.
    Navigate(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Succeeded,
    Failed { message: Option<String> },
}

impl CallbackOutcome {
    pub fn authenticated(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

pub fn query_params(url: &Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

/// Reads the callback marker. Unknown values count as no callback.
pub fn interpret_callback(params: &HashMap<String, String>) -> Option<CallbackOutcome> {
    match params.get(CALLBACK_PARAM).map(String::as_str) {
        Some(CALLBACK_SUCCESS) => Some(CallbackOutcome::Succeeded),
        Some(CALLBACK_ERROR) => Some(CallbackOutcome::Failed {
            message: params
                .get(CALLBACK_MESSAGE_PARAM)
                .filter(|message| !message.is_empty())
                .cloned(),
        }),
        _ => None,
    }
}

/// Drops the marker and its message, keeping every other parameter in order.
pub fn strip_callback_marker(url: &Url) -> Url {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| key != CALLBACK_PARAM && key != CALLBACK_MESSAGE_PARAM)
        .collect();

    let mut cleaned = url.clone();
    if retained.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(retained);
    }
    cleaned
}

#[cfg(test)]
#[path = "tests/callback_tests.rs"]
mod tests;
