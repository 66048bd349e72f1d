use orgdir_derive::orgdir_error;

#[orgdir_error]
pub enum LookupFault {
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

fn main() {}
