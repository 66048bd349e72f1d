use std::borrow::Cow;

#[orgdir_derive::orgdir_error]
pub enum LookupError {
    #[error("Registry has no company for{}: {identifier}", format_context(.context))]
    NotFound { identifier: String, context: Option<Cow<'static, str>> },

    #[error("Registry answered HTTP {status}{}", format_context(.context))]
    Status { status: u16, context: Option<Cow<'static, str>> },

    #[error("Registry request failed{}: {source}", format_context(.context))]
    Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid registry client configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
