mod builder;
mod codec;
mod error;
mod finalize;
mod iter;
mod layout;
mod node;
mod query;
mod region;

pub use builder::Builder;
pub use error::{QuadtreeError, Result};
pub use iter::QueryIter;
pub use layout::FinalizedTree;
pub use query::{query_array, query_array_fast};
pub use region::{Item, Quadrant, Region};

impl FinalizedTree {
    pub fn query_iter(&self, region: Region) -> QueryIter<'_> {
        QueryIter::new(self, region)
    }

    pub fn query_array(&self, region: Region, max_n: usize) -> Vec<Item> {
        query_array(self, region, max_n)
    }

    pub fn query_array_fast(&self, region: Region, max_n: usize) -> Vec<Item> {
        query_array_fast(self, region, max_n)
    }
}
