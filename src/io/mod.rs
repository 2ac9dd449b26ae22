pub mod reader;
pub mod writer;

pub use reader::{DocumentReader, ReaderConfig};
pub use writer::{
    generate_diff, write_artifacts, write_atomic, ArtifactSink, ArtifactWriter, LineEndings,
    MemorySink, WriteResult, WriterConfig,
};
