use orgdir_derive::orgdir_error;

#[orgdir_error]
pub enum LookupFault {
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

fn main() {}
