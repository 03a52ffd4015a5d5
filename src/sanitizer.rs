use ammonia::Builder;

/// Turns untrusted markup into markup that is safe to render.
///
/// Implementations must be total and idempotent: cleaning already-clean
/// output returns it unchanged.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Ammonia-backed policy for user-generated content.
///
/// Ammonia's defaults already drop scripts, styles, event handler attributes
/// and unsafe URL schemes. On top of that every anchor gets
/// `rel="nofollow"`, replacing whatever `rel` the input carried.
pub struct HtmlSanitizer {
    builder: Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder.link_rel(Some("nofollow"));
        Self { builder }
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}
