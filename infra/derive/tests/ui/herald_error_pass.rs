use herald_derive::herald_error;
use std::borrow::Cow;

#[herald_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/not/here").context("Reading fixture")
}

fn main() {
    let err = read_missing().unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert!(err.to_string().starts_with("IO error (Reading fixture)"));

    let err: DemoError = "boom".into();
    assert_eq!(err.kind(), "Internal");
    assert_eq!(err.to_string(), "Internal error: boom");

    let err = Err::<(), _>(DemoError::from(String::from("late"))).context("With context").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (With context): late");
}
