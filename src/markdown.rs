//! Markdown to sanitized HTML rendering for post and comment bodies.
//!
//! Rendering follows GitHub-flavored markdown with single newlines kept as line breaks, then
//! runs the HTML through an allow-list sanitizer so author-supplied markup can never inject
//! scripts, event handlers, or `javascript:` URLs.

// crates.io
use pulldown_cmark::{Event, Options, Parser, html};

/// Renders `content` to sanitized HTML. Empty input renders to an empty string.
pub fn render_markdown(content: &str) -> String {
	if content.is_empty() {
		return String::new();
	}

	let parser = Parser::new_ext(content, gfm_options()).map(|event| match event {
		Event::SoftBreak => Event::HardBreak,
		_ => event,
	});
	let mut rendered = String::with_capacity(content.len() * 3 / 2);

	html::push_html(&mut rendered, parser);

	sanitizer().clean(&rendered).to_string()
}

/// Default allow-list plus the disabled checkboxes that task list items render to.
fn sanitizer() -> ammonia::Builder<'static> {
	let mut builder = ammonia::Builder::default();

	builder
		.add_tags(["input"])
		.add_tag_attributes("input", ["checked"])
		.add_tag_attribute_values("input", "type", ["checkbox"])
		.set_tag_attribute_value("input", "type", "checkbox")
		.set_tag_attribute_value("input", "disabled", "");

	builder
}

fn gfm_options() -> Options {
	let mut options = Options::empty();

	options.insert(Options::ENABLE_TABLES);
	options.insert(Options::ENABLE_STRIKETHROUGH);
	options.insert(Options::ENABLE_TASKLISTS);
	options.insert(Options::ENABLE_GFM);

	options
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_input_renders_nothing() {
		assert_eq!(render_markdown(""), "");
	}

	#[test]
	fn single_newlines_become_line_breaks() {
		let html = render_markdown("first line\nsecond line");

		assert!(html.contains("first line<br>"), "unexpected output: {html}");
		assert!(html.contains("second line"));
	}

	#[test]
	fn gfm_tables_and_strikethrough_render() {
		let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");

		assert!(html.contains("<table>"), "unexpected output: {html}");
		assert!(html.contains("<del>gone</del>"), "unexpected output: {html}");
	}

	#[test]
	fn scripts_and_handlers_are_stripped() {
		let html = render_markdown(
			"<script>alert(1)</script>\n\n<img src=\"x.png\" onerror=\"alert(2)\">\n\n[link](javascript:alert(3))",
		);

		assert!(!html.contains("<script"), "unexpected output: {html}");
		assert!(!html.contains("onerror"), "unexpected output: {html}");
		assert!(!html.contains("javascript:"), "unexpected output: {html}");
		assert!(html.contains("<img src=\"x.png\""), "unexpected output: {html}");
	}

	#[test]
	fn headings_and_code_survive_sanitizing() {
		let html = render_markdown("# Title\n\n```rust\nfn main() {}\n```");

		assert!(html.contains("<h1>Title</h1>"), "unexpected output: {html}");
		assert!(html.contains("<pre><code"), "unexpected output: {html}");
		assert!(html.contains("fn main() {}"));
	}

	#[test]
	fn task_lists_keep_disabled_checkboxes() {
		let html = render_markdown("- [x] done\n- [ ] todo");

		assert_eq!(html.matches("<input").count(), 2, "unexpected output: {html}");
		assert_eq!(html.matches("type=\"checkbox\"").count(), 2, "unexpected output: {html}");
		assert_eq!(html.matches("checked").count(), 1, "unexpected output: {html}");
		assert_eq!(html.matches("disabled").count(), 2, "unexpected output: {html}");
		assert!(html.contains("done"));
	}

	#[test]
	fn raw_inputs_are_forced_to_disabled_checkboxes() {
		let html = render_markdown("<input type=\"text\" name=\"q\" onfocus=\"alert(1)\">");

		assert!(!html.contains("type=\"text\""), "unexpected output: {html}");
		assert!(!html.contains("name="), "unexpected output: {html}");
		assert!(!html.contains("onfocus"), "unexpected output: {html}");
		assert!(html.contains("type=\"checkbox\""), "unexpected output: {html}");
		assert!(html.contains("disabled"), "unexpected output: {html}");
	}
}
