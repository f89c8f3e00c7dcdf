pub mod token_reduction;

pub use token_reduction::{
    ReductionMode, ReductionStats, TokenReducer, TokenReductionConfig, batch_reduce_tokens, get_reduction_stats,
    reduce_tokens, reduce_tokens_with_manager,
};
