use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::wallpaper::staging_path;

pub const SEARCH_URL: &str = "https://wallhaven.cc/api/v1/search";

const USER_AGENT: &str = concat!("wallchanger/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    General,
    Anime,
    People,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::General, Category::Anime, Category::People];

    /// Wallhaven's `categories` bitmask (general, anime, people).
    pub fn mask(self) -> &'static str {
        match self {
            Category::General => "100",
            Category::Anime => "010",
            Category::People => "001",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::General => "general",
            Category::Anime => "anime",
            Category::People => "people",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    #[default]
    Any,
    FullHd,
    Qhd,
    Uhd,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Any,
        Resolution::FullHd,
        Resolution::Qhd,
        Resolution::Uhd,
    ];

    pub fn at_least(self) -> Option<&'static str> {
        match self {
            Resolution::Any => None,
            Resolution::FullHd => Some("1920x1080"),
            Resolution::Qhd => Some("2560x1440"),
            Resolution::Uhd => Some("3840x2160"),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.at_least().unwrap_or("Any"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sorting {
    #[default]
    Toplist,
    Latest,
    Random,
}

impl Sorting {
    pub const ALL: [Sorting; 3] = [Sorting::Toplist, Sorting::Latest, Sorting::Random];

    pub fn as_param(self) -> &'static str {
        match self {
            Sorting::Toplist => "toplist",
            Sorting::Latest => "date_added",
            Sorting::Random => "random",
        }
    }
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sorting::Toplist => "Toplist",
            Sorting::Latest => "Latest",
            Sorting::Random => "Random",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchParams {
    pub category: Category,
    pub resolution: Resolution,
    pub sorting: Sorting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub thumb_url: String,
    pub full_url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    path: Option<String>,
    #[serde(default)]
    thumbs: Thumbs,
}

#[derive(Deserialize, Default)]
struct Thumbs {
    small: Option<String>,
}

pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

pub fn search_url(cfg: &Config, params: &SearchParams) -> Result<Url> {
    let mut url = Url::parse(&cfg.wallhaven_url)?;
    {
        let mut query = url.query_pairs_mut();
        let api_key = cfg.wallhaven_api_key.trim();
        if !api_key.is_empty() {
            query.append_pair("apikey", api_key);
        }
        query
            .append_pair("categories", params.category.mask())
            .append_pair("purity", cfg.wallhaven_purity.trim())
            .append_pair("sorting", params.sorting.as_param())
            .append_pair("atleast", params.resolution.at_least().unwrap_or(""));
    }
    Ok(url)
}

fn parse_entries(payload: SearchResponse) -> Vec<Entry> {
    payload
        .data
        .into_iter()
        .filter_map(|item| {
            let full_url = item.path.filter(|s| !s.is_empty())?;
            let thumb_url = item.thumbs.small.filter(|s| !s.is_empty())?;
            Some(Entry {
                thumb_url,
                full_url,
            })
        })
        .collect()
}

pub async fn search(client: &reqwest::Client, cfg: &Config, params: SearchParams) -> Result<Vec<Entry>> {
    let url = search_url(cfg, &params)?;
    tracing::info!(
        category = %params.category,
        resolution = %params.resolution,
        sorting = %params.sorting,
        "searching wallhaven"
    );

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        tracing::error!(status = %resp.status(), "wallhaven search failed");
        return Err(Error::Status(resp.status()));
    }

    let payload: SearchResponse = resp.json().await?;
    Ok(parse_entries(payload))
}

pub async fn fetch_thumbnail(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Status(resp.status()));
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads `url` into `dest`, replacing whatever was there.
///
/// The file is only written once the body is known to be an image.
pub async fn download_image(client: &reqwest::Client, url: &str, dest: &Path) -> Result<PathBuf> {
    let mut resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        tracing::error!(url, status = %resp.status(), "failed to download image");
        return Err(Error::Status(resp.status()));
    }

    let mut body = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        body.extend_from_slice(&chunk);
    }

    if image::guess_format(&body).is_err() {
        return Err(Error::NotAnImage);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = staging_path(dest);
    if let Err(e) = fs::write(&tmp, &body) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    fs::rename(&tmp, dest)?;

    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PNG_BYTES, Route, serve, test_client};

    fn config_for(base: &str) -> Config {
        Config {
            wallhaven_url: format!("{base}/api/v1/search"),
            ..Config::default()
        }
    }

    #[test]
    fn search_url_carries_filters() {
        let cfg = Config {
            wallhaven_api_key: String::from(" secret "),
            ..Config::default()
        };
        let params = SearchParams {
            category: Category::Anime,
            resolution: Resolution::Qhd,
            sorting: Sorting::Latest,
        };

        let url = search_url(&cfg, &params).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("apikey".into(), "secret".into())));
        assert!(pairs.contains(&("categories".into(), "010".into())));
        assert!(pairs.contains(&("purity".into(), "100".into())));
        assert!(pairs.contains(&("sorting".into(), "date_added".into())));
        assert!(pairs.contains(&("atleast".into(), "2560x1440".into())));
    }

    #[test]
    fn search_url_without_key_or_resolution() {
        let url = search_url(&Config::default(), &SearchParams::default()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.iter().all(|(k, _)| k != "apikey"));
        assert!(pairs.contains(&("atleast".into(), String::new())));
        assert!(pairs.contains(&("sorting".into(), "toplist".into())));
    }

    #[test]
    fn incomplete_items_are_dropped() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{"data":[
                {"path":"https://w/full1.jpg","thumbs":{"small":"https://w/t1.jpg"}},
                {"path":"https://w/full2.jpg","thumbs":{}},
                {"thumbs":{"small":"https://w/t3.jpg"}},
                {"path":"","thumbs":{"small":"https://w/t4.jpg"}}
            ]}"#,
        )
        .unwrap();

        let entries = parse_entries(payload);
        assert_eq!(
            entries,
            vec![Entry {
                thumb_url: "https://w/t1.jpg".into(),
                full_url: "https://w/full1.jpg".into(),
            }]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(Category::People.to_string(), "people");
        assert_eq!(Resolution::Any.to_string(), "Any");
        assert_eq!(Resolution::Uhd.to_string(), "3840x2160");
        assert_eq!(Sorting::Random.to_string(), "Random");
    }

    #[tokio::test]
    async fn search_returns_entries() {
        let body = r#"{"data":[
            {"path":"https://w/a.jpg","thumbs":{"small":"https://w/ta.jpg"}},
            {"path":"https://w/b.jpg","thumbs":{"small":"https://w/tb.jpg"}}
        ]}"#;
        let base = serve(vec![Route::ok("/api/v1/search", "application/json", body.as_bytes())]).await;

        let entries = search(&test_client(), &config_for(&base), SearchParams::default())
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].full_url, "https://w/b.jpg");
        assert_eq!(entries[1].thumb_url, "https://w/tb.jpg");
    }

    #[tokio::test]
    async fn search_reports_bad_status() {
        let base = serve(vec![Route::status("/api/v1/search", 500)]).await;

        let err = search(&test_client(), &config_for(&base), SearchParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn download_writes_and_overwrites_target() {
        let base = serve(vec![Route::ok("/full.png", "image/png", PNG_BYTES)]).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("wallpaper.jpg");
        fs::write(&dest, b"old").unwrap();

        let path = download_image(&test_client(), &format!("{base}/full.png"), &dest)
            .await
            .unwrap();

        assert_eq!(path, dest);
        assert_eq!(fs::read(&dest).unwrap(), PNG_BYTES);

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("wallpaper.jpg")]);
    }

    #[tokio::test]
    async fn failed_download_leaves_current_file_alone() {
        let base = serve(vec![Route::status("/gone.png", 404)]).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("wallpaper.jpg");
        fs::write(&dest, b"old").unwrap();

        assert!(download_image(&test_client(), &format!("{base}/gone.png"), &dest)
            .await
            .is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[tokio::test]
    async fn download_rejects_non_images() {
        let base = serve(vec![Route::ok("/page", "text/html", b"<html></html>")]).await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("wallpaper.jpg");

        let err = download_image(&test_client(), &format!("{base}/page"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotAnImage));
        assert!(!dest.exists());
    }
}
