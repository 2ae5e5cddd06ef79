//! Theme - palette values the reader injects into the mounted document

use serde::{Deserialize, Serialize};

/// Subset of the embedding app's theme used by the reader styles.
/// Values are copied into CSS verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub text_primary: String,
    pub primary_main: String,
    pub background_paper: String,
    pub background_default: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Helvetica Neue, Helvetica, Roboto, Arial, sans-serif".to_string(),
            text_primary: "rgba(0, 0, 0, 0.87)".to_string(),
            primary_main: "#2E77D0".to_string(),
            background_paper: "#FFFFFF".to_string(),
            background_default: "#F8F8F8".to_string(),
        }
    }
}

/// Styles injected before mount: theme colors plus the layout overrides
/// that fit MkDocs pages into the app frame
pub fn reader_css(theme: &Theme) -> String {
    format!(
        r#"
body {{
  font-family: {font_family};
  --md-text-color: {text_primary};
  --md-text-link-color: {primary_main};
  --md-code-fg-color: {text_primary};
  --md-code-bg-color: {background_paper};
}}
.md-main__inner {{ margin-top: 0; }}
.md-sidebar {{ position: fixed; bottom: 100px; width: 20rem; }}
.md-sidebar--secondary {{ right: 2rem; }}
.md-content {{ margin-bottom: 50px }}
.md-footer {{ position: fixed; bottom: 0px; width: 100vw; }}
.md-footer-nav__link {{ width: 20rem; }}
.md-content {{ margin-left: 20rem; max-width: calc(100% - 20rem * 2 - 3rem); }}
.md-typeset {{ font-size: 1rem; }}
.md-nav {{ font-size: 1rem; }}
.md-grid {{ max-width: 90vw; margin: 0 }}
@media screen and (max-width: 76.1875em) {{
  .md-nav {{
    background-color: {background_default};
    transition: none !important
  }}
  .md-sidebar--secondary {{ display: none; }}
  .md-sidebar--primary {{ left: 72px; width: 10rem }}
  .md-content {{ margin-left: 10rem; max-width: 100%; }}
  .md-content__inner {{ font-size: 0.9rem }}
  .md-footer {{
    position: static;
    margin-left: 10rem;
    width: calc(100% - 10rem);
  }}
  .md-nav--primary .md-nav__title {{
    white-space: normal;
    height: auto;
    line-height: 1rem;
    cursor: auto;
  }}
  .md-nav--primary > .md-nav__title [for="none"] {{
    padding-top: 0;
  }}
}}
"#,
        font_family = theme.font_family,
        text_primary = theme.text_primary,
        primary_main = theme.primary_main,
        background_paper = theme.background_paper,
        background_default = theme.background_default,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_values_injected() {
        let theme = Theme {
            font_family: "Inter".to_string(),
            text_primary: "#111".to_string(),
            primary_main: "#0af".to_string(),
            background_paper: "#fff".to_string(),
            background_default: "#eee".to_string(),
        };

        let css = reader_css(&theme);

        assert!(css.contains("font-family: Inter;"));
        assert!(css.contains("--md-text-color: #111;"));
        assert!(css.contains("--md-code-fg-color: #111;"));
        assert!(css.contains("--md-text-link-color: #0af;"));
        assert!(css.contains("--md-code-bg-color: #fff;"));
        assert!(css.contains("background-color: #eee;"));
    }

    #[test]
    fn test_partial_theme_json() {
        let theme: Theme = serde_json::from_str(r##"{"primary_main":"#ff0000"}"##).unwrap();

        assert_eq!(theme.primary_main, "#ff0000");
        assert_eq!(theme.font_family, Theme::default().font_family);
    }
}
