mod gateway;

pub use gateway::{CommentReactions, GatewayResult, PostLikeState, ReactionGateway};
