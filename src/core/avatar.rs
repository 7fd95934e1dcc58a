use crate::core::{AuthorImage, ImageProbe, QuoteService};
use std::time::Duration;
use url::form_urlencoded;

pub const INITIALS_PLACEHOLDER: &str = "{initials}";
pub const DEFAULT_AVATAR_TEMPLATE: &str =
    "https://ui-avatars.com/api/?name={initials}&background=random&size=256";
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(8);

/// 前兩個字的首字母大寫，名字為空時回傳 `?`
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

pub fn initials_avatar_url(template: &str, author: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(initials(author).as_bytes()).collect();
    template.replace(INITIALS_PLACEHOLDER, &encoded)
}

/// 取得作者圖片；遠端圖片失敗或逾時就改用縮寫頭像
pub struct ImageResolver<P: ImageProbe> {
    probe: P,
    timeout: Duration,
    template: String,
}

impl<P: ImageProbe> ImageResolver<P> {
    pub fn new(probe: P, timeout: Duration, template: impl Into<String>) -> Self {
        Self {
            probe,
            timeout,
            template: template.into(),
        }
    }

    pub fn fallback(&self, author: &str) -> AuthorImage {
        AuthorImage::Initials(initials_avatar_url(&self.template, author))
    }

    pub async fn resolve<S: QuoteService + ?Sized>(&self, service: &S, author: &str) -> AuthorImage {
        let url = match service.get_image(author).await {
            Ok(url) if !url.trim().is_empty() => url,
            Ok(_) => {
                tracing::info!("No image for {}, using initials avatar", author);
                return self.fallback(author);
            }
            Err(e) => {
                tracing::warn!("Image lookup for {} failed: {}", author, e);
                return self.fallback(author);
            }
        };

        // 逾時時 probe 的 future 會被丟棄，請求也就放棄了
        match tokio::time::timeout(self.timeout, self.probe.probe(&url)).await {
            Ok(Ok(())) => AuthorImage::Remote(url),
            Ok(Err(e)) => {
                tracing::warn!("Image {} failed to load: {}", url, e);
                self.fallback(author)
            }
            Err(_) => {
                tracing::warn!(
                    "Image {} did not load within {}s",
                    url,
                    self.timeout.as_secs_f32()
                );
                self.fallback(author)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{HintTier, LoadSummary, Quote};
    use crate::utils::error::{AppError, Result};
    use async_trait::async_trait;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("albert einstein junior"), "AE");
        assert_eq!(initials("  Plato "), "P");
        assert_eq!(initials(""), "?");
        assert_eq!(initials("émile zola"), "ÉZ");
    }

    #[test]
    fn test_initials_avatar_url() {
        assert_eq!(
            initials_avatar_url(DEFAULT_AVATAR_TEMPLATE, "Ada Lovelace"),
            "https://ui-avatars.com/api/?name=AL&background=random&size=256"
        );
        assert_eq!(
            initials_avatar_url("https://a.example/{initials}.png", ""),
            "https://a.example/%3F.png"
        );
    }

    struct ImageService(Result<String>);

    #[async_trait]
    impl QuoteService for ImageService {
        async fn load_quotes(&self) -> Result<LoadSummary> {
            unreachable!()
        }
        async fn new_game(&self) -> Result<Quote> {
            unreachable!()
        }
        async fn check_answer(&self, _answer: &str, _author: &str) -> Result<bool> {
            unreachable!()
        }
        async fn get_hint(&self, _tier: HintTier, _author: &str, _bio: &str) -> Result<String> {
            unreachable!()
        }
        async fn get_image(&self, _author: &str) -> Result<String> {
            match &self.0 {
                Ok(url) => Ok(url.clone()),
                Err(_) => Err(AppError::ServiceError {
                    endpoint: "/api/get-image".to_string(),
                    message: "not found".to_string(),
                }),
            }
        }
    }

    enum Probe {
        Loads,
        Broken,
        Hangs,
    }

    #[async_trait]
    impl ImageProbe for Probe {
        async fn probe(&self, url: &str) -> Result<()> {
            match self {
                Probe::Loads => Ok(()),
                Probe::Broken => Err(AppError::HttpStatusError {
                    endpoint: url.to_string(),
                    status: 404,
                }),
                Probe::Hangs => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
            }
        }
    }

    fn resolver(probe: Probe) -> ImageResolver<Probe> {
        ImageResolver::new(probe, Duration::from_millis(50), DEFAULT_AVATAR_TEMPLATE)
    }

    const AVATAR: &str = "https://ui-avatars.com/api/?name=AL&background=random&size=256";

    #[tokio::test]
    async fn test_remote_image_used_when_it_loads() {
        let service = ImageService(Ok("https://img.example/ada.jpg".to_string()));
        let image = resolver(Probe::Loads).resolve(&service, "Ada Lovelace").await;
        assert_eq!(image, AuthorImage::Remote("https://img.example/ada.jpg".to_string()));
    }

    #[tokio::test]
    async fn test_broken_image_falls_back() {
        let service = ImageService(Ok("https://img.example/ada.jpg".to_string()));
        let image = resolver(Probe::Broken).resolve(&service, "Ada Lovelace").await;
        assert_eq!(image, AuthorImage::Initials(AVATAR.to_string()));
    }

    #[tokio::test]
    async fn test_slow_image_times_out() {
        let service = ImageService(Ok("https://img.example/ada.jpg".to_string()));
        let image = resolver(Probe::Hangs).resolve(&service, "Ada Lovelace").await;
        assert_eq!(image, AuthorImage::Initials(AVATAR.to_string()));
    }

    #[tokio::test]
    async fn test_lookup_failure_or_empty_url_falls_back() {
        let failing = ImageService(Err(AppError::ConfigError {
            message: String::new(),
        }));
        assert_eq!(
            resolver(Probe::Loads).resolve(&failing, "Ada Lovelace").await,
            AuthorImage::Initials(AVATAR.to_string())
        );

        let empty = ImageService(Ok(String::new()));
        assert_eq!(
            resolver(Probe::Loads).resolve(&empty, "Ada Lovelace").await,
            AuthorImage::Initials(AVATAR.to_string())
        );
    }
}
