mod bucket_name;
mod entry_id;
mod image_path;
mod tag_set;

pub use bucket_name::{BucketName, KEY_VISUALS_BUCKET};
pub use entry_id::EntryId;
pub use image_path::ImagePath;
pub use tag_set::TagSet;
