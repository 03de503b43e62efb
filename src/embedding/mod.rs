// Word embeddings: skip-gram training, nearest-neighbour queries and a 2-D
// projection for plotting.

pub mod model;
pub mod projection;
pub mod similarity;
pub mod skipgram;
pub mod vocab;
