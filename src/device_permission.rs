pub mod impl_fake;
pub mod impl_video_node;
pub mod interface;
