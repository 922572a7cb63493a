// Request handlers for the upload form.
//
// Pages are Handlebars templates compiled into the binary. `{{value}}`
// expressions are HTML-escaped by Handlebars, so extracted document text
// can go straight into the data.

mod compare;
mod index;

pub use compare::compare;
pub use index::index;

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;

pub(crate) const INDEX_PAGE: &str = "index";
pub(crate) const RESULT_PAGE: &str = "result";

const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");
const RESULT_TEMPLATE: &str = include_str!("../../../templates/result.html");

/// Build the template registry with every page registered.
pub fn templates() -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string(INDEX_PAGE, INDEX_TEMPLATE)
        .context("Failed to register index template")?;
    handlebars
        .register_template_string(RESULT_PAGE, RESULT_TEMPLATE)
        .context("Failed to register result template")?;
    Ok(handlebars)
}

/// Render a registered page with `data`.
fn render_page<T: Serialize>(
    handlebars: &Handlebars<'_>,
    page: &str,
    data: &T,
) -> Result<String> {
    handlebars
        .render(page, data)
        .with_context(|| format!("Failed to render {page} page"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_register() {
        let handlebars = templates().unwrap();
        assert!(handlebars.has_template(INDEX_PAGE));
        assert!(handlebars.has_template(RESULT_PAGE));
    }

    #[test]
    fn test_result_page_escapes_diff() {
        let handlebars = templates().unwrap();
        let page = render_page(
            &handlebars,
            RESULT_PAGE,
            &json!({
                "similarity": "0.5000",
                "band": "related",
                "differences": "-<script>alert(\"x&y\")</script>",
            }),
        )
        .unwrap();
        assert!(page.contains("-&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_strict_mode_rejects_missing_data() {
        let handlebars = templates().unwrap();
        assert!(render_page(&handlebars, RESULT_PAGE, &json!({ "similarity": "1.0" })).is_err());
    }
}
