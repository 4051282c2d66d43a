//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as out-of-band swaps over the alert container that
//! [base](crate::html::base) places on every page, so a fragment response
//! can surface a message regardless of which element triggered the request.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_BOX_STYLE: &str = "p-4 text-sm rounded border \
    text-green-800 bg-green-50 border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_BOX_STYLE: &str = "p-4 text-sm rounded border \
    text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// A message to display to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    Success {
        /// Short description of what succeeded.
        message: String,
    },
    /// The action failed.
    Error {
        /// Short description of what failed.
        message: String,
        /// Extra detail shown below the message.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap over the page's alert container.
    pub fn into_markup(self) -> Markup {
        let (box_style, message, details) = match self {
            Alert::Success { message } => (SUCCESS_BOX_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_BOX_STYLE, message, details),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="outerHTML"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(box_style) role="alert"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_markup().into_response()
    }
}
