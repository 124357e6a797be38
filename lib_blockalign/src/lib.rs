pub mod block;
pub mod color;
pub mod config;
pub mod conservation;
pub mod error;
pub mod ibm;
mod io;
pub mod multiple_alignment;
pub mod pssm;
pub mod residue;
pub mod sequence;

pub use block::{
    AlignedBlock, Block, BlockId, SequenceRange, UnalignedBlock, UnalignedJustification,
};
pub use config::AlignmentOptions;
pub use multiple_alignment::BlockMultipleAlignment;
pub use sequence::Sequence;
