use std::borrow::Cow;

/// Errors raised while composing a Herald host.
#[herald_derive::herald_error]
pub enum HeraldError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// The process default registry was already initialized.
    #[error("Global registry error{}: {message}", format_context(.context))]
    GlobalAlreadySet { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
