use herald_derive::herald_error;

#[herald_error]
pub enum TickError {
    #[error("Tick overflow: {0}")]
    Overflow(u64),
}

fn main() {}
