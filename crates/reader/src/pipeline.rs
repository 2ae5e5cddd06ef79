//! Transform pipeline - ordered document rewriting
//!
//! A step takes the document by value and hands back the next one. `None`
//! means "not ready" or "nothing sensible to produce" and halts the
//! pipeline without an error; later steps never run.

use techdocs_dom::Document;

/// One rewriting step
///
/// Any `Fn(Document) -> Option<Document>` closure is a step, so ad-hoc steps
/// need no type of their own.
pub trait Transformer: Send + Sync {
    /// Name used in logs when the step halts the pipeline
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn transform(&self, dom: Document) -> Option<Document>;
}

impl<F> Transformer for F
where
    F: Fn(Document) -> Option<Document> + Send + Sync,
{
    fn transform(&self, dom: Document) -> Option<Document> {
        self(dom)
    }
}

pub type Steps = Vec<Box<dyn Transformer>>;

/// Pipeline input: raw markup or an already-built tree
pub enum Source {
    Markup(String),
    Tree(Document),
}

impl From<String> for Source {
    fn from(html: String) -> Self {
        Source::Markup(html)
    }
}

impl From<&str> for Source {
    fn from(html: &str) -> Self {
        Source::Markup(html.to_string())
    }
}

impl From<Document> for Source {
    fn from(dom: Document) -> Self {
        Source::Tree(dom)
    }
}

/// Run `steps` in order over `input`
///
/// Returns the last step's output, or `None` as soon as any step returns
/// `None`. An empty step list returns the input untouched.
pub fn transform(input: impl Into<Source>, steps: &[Box<dyn Transformer>]) -> Option<Document> {
    let mut dom = match input.into() {
        Source::Tree(dom) => dom,
        Source::Markup(html) => match Document::parse(&html) {
            Ok(dom) => dom,
            Err(err) => {
                tracing::debug!("[Transformer] markup produced no document: {}", err);
                return None;
            }
        },
    };

    for step in steps {
        match step.transform(dom) {
            Some(next) => dom = next,
            None => {
                tracing::debug!(step = step.name(), "[Transformer] step returned no document, halting");
                return None;
            }
        }
    }

    Some(dom)
}
