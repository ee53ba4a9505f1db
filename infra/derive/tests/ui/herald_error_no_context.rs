use herald_derive::herald_error;

#[herald_error]
pub enum PlayerError {
    #[error("Lookup failed: {source}")]
    Lookup {
        #[source]
        source: std::io::Error,
    },
}

fn main() {}
