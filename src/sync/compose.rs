// SPDX-License-Identifier: MPL-2.0

//! New posts and stories. Both need an image; the caption or story text is
//! optional.

use crate::api::{ClientError, Post, SocialApi, Story, Upload};
use tracing::{debug, warn};

fn require_image(image: &Upload) -> Result<(), ClientError> {
    if image.bytes.is_empty() {
        return Err(ClientError::Validation("please select an image".into()));
    }
    Ok(())
}

/// Upload a post. Nothing is sent when the image is empty.
pub async fn publish_post(
    api: &dyn SocialApi,
    image: Upload,
    caption: &str,
) -> Result<Post, ClientError> {
    require_image(&image)?;

    match api.create_post(image, caption.trim()).await {
        Ok(post) => {
            debug!(post_id = post.id, "post published");
            Ok(post)
        }
        Err(e) => {
            warn!("failed to upload post: {e}");
            Err(e)
        }
    }
}

/// Upload a story. Nothing is sent when the image is empty.
pub async fn publish_story(
    api: &dyn SocialApi,
    image: Upload,
    text_content: &str,
) -> Result<Story, ClientError> {
    require_image(&image)?;

    match api.create_story(image, text_content.trim()).await {
        Ok(story) => {
            debug!(story_id = story.id, "story published");
            Ok(story)
        }
        Err(e) => {
            warn!("failed to create story: {e}");
            Err(e)
        }
    }
}
