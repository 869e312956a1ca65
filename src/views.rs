//! Template engine setup. Templates are embedded in the binary and
//! parsed once on first use; a parse failure is a programming error
//! caught by the `templates_parse` test.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("errors.html", include_str!("../templates/errors.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("error.html", include_str!("../templates/error.html")),
        ("category_list.html", include_str!("../templates/category_list.html")),
        ("category_detail.html", include_str!("../templates/category_detail.html")),
        ("category_form.html", include_str!("../templates/category_form.html")),
        ("category_delete.html", include_str!("../templates/category_delete.html")),
        ("perishable_list.html", include_str!("../templates/perishable_list.html")),
        ("perishable_detail.html", include_str!("../templates/perishable_detail.html")),
        ("perishable_form.html", include_str!("../templates/perishable_form.html")),
        ("perishable_delete.html", include_str!("../templates/perishable_delete.html")),
        (
            "perishableinstance_list.html",
            include_str!("../templates/perishableinstance_list.html"),
        ),
        (
            "perishableinstance_detail.html",
            include_str!("../templates/perishableinstance_detail.html"),
        ),
        (
            "perishableinstance_form.html",
            include_str!("../templates/perishableinstance_form.html"),
        ),
        (
            "perishableinstance_delete.html",
            include_str!("../templates/perishableinstance_delete.html"),
        ),
        ("cookware_list.html", include_str!("../templates/cookware_list.html")),
        ("cookware_detail.html", include_str!("../templates/cookware_detail.html")),
        ("cookware_form.html", include_str!("../templates/cookware_form.html")),
        ("cookware_delete.html", include_str!("../templates/cookware_delete.html")),
        (
            "cookwareinstance_list.html",
            include_str!("../templates/cookwareinstance_list.html"),
        ),
        (
            "cookwareinstance_detail.html",
            include_str!("../templates/cookwareinstance_detail.html"),
        ),
        (
            "cookwareinstance_form.html",
            include_str!("../templates/cookwareinstance_form.html"),
        ),
        (
            "cookwareinstance_delete.html",
            include_str!("../templates/cookwareinstance_delete.html"),
        ),
        ("recipe_list.html", include_str!("../templates/recipe_list.html")),
        ("recipe_detail.html", include_str!("../templates/recipe_detail.html")),
        ("recipe_form.html", include_str!("../templates/recipe_form.html")),
        ("recipe_delete.html", include_str!("../templates/recipe_delete.html")),
    ])
    .expect("failed to parse embedded templates");
    tera
});

pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse() {
        // Forces the Lazy, panicking on any template syntax error
        assert!(TEMPLATES.get_template_names().count() > 20);
    }

    #[test]
    fn error_page_renders() {
        let mut ctx = Context::new();
        ctx.insert("title", "Category Not Found");
        ctx.insert("status", &404);
        let html = render("error.html", &ctx).unwrap();
        assert!(html.contains("Category Not Found"));
    }

    #[test]
    fn form_errors_are_listed() {
        let mut ctx = Context::new();
        ctx.insert("title", "Create New Category");
        ctx.insert("errors", &vec!["Category title must contain at least 3 characters"]);
        ctx.insert("category", &serde_json::json!({ "title": "ab", "image": null }));
        let html = render("category_form.html", &ctx).unwrap();
        assert!(html.contains("at least 3 characters"));
        // entered value survives the round trip
        assert!(html.contains("value=\"ab\""));
    }

    #[test]
    fn form_input_is_escaped() {
        let mut ctx = Context::new();
        ctx.insert("title", "Create New Category");
        ctx.insert(
            "category",
            &serde_json::json!({ "title": "<script>alert(1)</script>", "image": null }),
        );
        let html = render("category_form.html", &ctx).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
