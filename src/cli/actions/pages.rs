use crate::widgets::{IconSet, PageRenderer, PageResult};
use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

#[derive(Debug)]
pub struct Args {
    /// Page result document; stdin when unset.
    pub file: Option<PathBuf>,
    pub html: bool,
    pub icons: bool,
    pub stylesheets: Vec<String>,
}

impl Args {
    #[must_use]
    pub fn icon_set(&self) -> IconSet {
        if self.icons {
            IconSet::FontAwesome
        } else {
            IconSet::detect(self.stylesheets.iter().map(String::as_str))
        }
    }
}

/// Renders a page result document as text or markup.
///
/// # Errors
/// Returns an error if the document is not JSON.
pub fn render(args: &Args, document: &str) -> Result<String> {
    let value: Value = serde_json::from_str(document).context("page result must be JSON")?;
    let page = PageResult::from_value(&value);

    let icons = args.icon_set();
    let view = PageRenderer::new(icons).view(&page);

    Ok(if args.html {
        view.to_html(icons)
    } else {
        view.to_string()
    })
}

/// Execute the pages action.
/// # Errors
/// Returns an error if the input cannot be read or parsed.
pub fn execute(args: &Args) -> Result<()> {
    let document = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    println!("{}", render(args, &document)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            file: None,
            html: false,
            icons: false,
            stylesheets: Vec::new(),
        }
    }

    #[test]
    fn test_icon_set() {
        assert_eq!(args().icon_set(), IconSet::Text);

        let forced = Args {
            icons: true,
            ..args()
        };
        assert_eq!(forced.icon_set(), IconSet::FontAwesome);

        let detected = Args {
            stylesheets: vec!["/css/font-awesome.min.css".to_string()],
            ..args()
        };
        assert_eq!(detected.icon_set(), IconSet::FontAwesome);
    }

    #[test]
    fn test_render_text() {
        let output = render(
            &args(),
            r#"{"content": [], "page": {"totalElements": 42, "totalPages": 5, "number": 0}}"#,
        )
        .unwrap();
        assert!(output.contains("共 42 筆 / 5 頁"));
    }

    #[test]
    fn test_render_empty_page() {
        let output = render(&args(), r#"{"content": [], "totalElements": 0}"#).unwrap();
        assert!(output.contains("無資料"));
    }

    #[test]
    fn test_render_html() {
        let html = Args {
            html: true,
            ..args()
        };
        let output = render(&html, r#"{"totalElements": 3, "totalPages": 1, "number": 0}"#).unwrap();
        assert!(output.contains("pagination"));
    }

    #[test]
    fn test_render_rejects_invalid_json() {
        assert!(render(&args(), "not json").is_err());
    }
}
