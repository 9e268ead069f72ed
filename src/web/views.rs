//! HTML rendering for every page.
//!
//! All user-supplied text goes through `text` or `attr` before it reaches
//! the markup.

use axum::http::StatusCode;
use axum::response::Html;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::db::{Product, User};
use crate::services::ProductFields;

/// One-line feedback shown above a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::Success(msg.into())
    }
}

fn text(s: &str) -> String {
    encode_text(s).into_owned()
}

fn attr(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

fn layout(title: &str, viewer: Option<&User>, body: &str) -> Html<String> {
    let nav = match viewer {
        Some(user) => format!(
            r#"<a href="/products/add">Add product</a> <span class="who">{}</span> <a href="/logout">Logout</a>"#,
            text(&user.username)
        ),
        None => r#"<a href="/login">Login</a> <a href="/register">Register</a>"#.to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav><a href="/">Home</a> <a href="/products">Products</a> {nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    ))
}

fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        Some(Notice::Error(msg)) => format!(r#"<p class="error">{}</p>"#, text(msg)),
        Some(Notice::Success(msg)) => format!(r#"<p class="success">{}</p>"#, text(msg)),
        None => String::new(),
    }
}

fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

fn product_table(products: &[Product], with_actions: bool) -> String {
    if products.is_empty() {
        return r#"<p class="empty">No products yet.</p>"#.to_string();
    }

    let mut rows = String::new();
    for product in products {
        let actions = if with_actions {
            format!(
                r#"<td><a href="/products/edit/{id}">Edit</a> <a href="/products/delete/{id}">Delete</a></td>"#,
                id = product.id
            )
        } else {
            String::new()
        };

        rows.push_str(&format!(
            r#"<tr><td><a href="/products/{id}">{name}</a></td><td>{price}</td><td>{description}</td>{actions}</tr>"#,
            id = product.id,
            name = text(&product.name),
            price = format_price(product.price),
            description = text(&product.description),
        ));
        rows.push('\n');
    }

    let actions_header = if with_actions { "<th></th>" } else { "" };
    format!(
        "<table>\n<tr><th>Name</th><th>Price</th><th>Description</th>{actions_header}</tr>\n{rows}</table>"
    )
}

fn product_form(action: &str, submit: &str, name: &str, price: &str, description: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label>Name <input type="text" name="name" value="{name}"></label>
<label>Price <input type="text" name="price" value="{price}"></label>
<label>Description <textarea name="description" maxlength="200">{description}</textarea></label>
<button type="submit">{submit}</button>
</form>"#,
        action = attr(action),
        name = attr(name),
        price = attr(price),
        description = text(description),
    )
}

pub fn home_page(viewer: Option<&User>, products: &[Product]) -> Html<String> {
    let body = match viewer {
        Some(user) => format!(
            "<h1>Welcome, {}</h1>\n<h2>Your products</h2>\n{}",
            text(&user.username),
            product_table(products, true)
        ),
        None => r#"<h1>Storefront</h1>
<p>Keep track of the things you sell.</p>
<p><a href="/login">Log in</a> or <a href="/register">create an account</a> to manage your products.</p>"#
            .to_string(),
    };

    layout("Home", viewer, &body)
}

pub fn products_page(viewer: Option<&User>, products: &[Product]) -> Html<String> {
    let body = format!("<h1>Products</h1>\n{}", product_table(products, true));
    layout("Products", viewer, &body)
}

/// Detail page. A missing product renders the same page with empty values.
pub fn product_page(viewer: Option<&User>, product: Option<&Product>) -> Html<String> {
    let (name, price, description) = product.map_or_else(
        || (String::new(), String::new(), String::new()),
        |p| {
            (
                text(&p.name),
                format_price(p.price),
                text(&p.description),
            )
        },
    );

    let body = format!(
        r#"<h1>{name}</h1>
<dl>
<dt>Price</dt><dd class="price">{price}</dd>
<dt>Description</dt><dd>{description}</dd>
</dl>"#
    );

    layout("Product", viewer, &body)
}

pub fn add_product_page(
    viewer: &User,
    fields: &ProductFields,
    notice: Option<&Notice>,
) -> Html<String> {
    let body = format!(
        "<h1>Add product</h1>\n{}\n{}",
        notice_html(notice),
        product_form(
            "/products/add",
            "Add",
            fields.name.as_deref().unwrap_or_default(),
            fields.price.as_deref().unwrap_or_default(),
            fields.description.as_deref().unwrap_or_default(),
        )
    );

    layout("Add product", Some(viewer), &body)
}

/// Edit page. A missing product renders an empty form.
pub fn edit_product_page(
    viewer: &User,
    id: i32,
    product: Option<&Product>,
    notice: Option<&Notice>,
) -> Html<String> {
    let action = format!("/products/edit/{id}");
    let form = match product {
        Some(p) => product_form(&action, "Save", &p.name, &p.price.to_string(), &p.description),
        None => product_form(&action, "Save", "", "", ""),
    };

    let body = format!("<h1>Edit product</h1>\n{}\n{}", notice_html(notice), form);
    layout("Edit product", Some(viewer), &body)
}

pub fn login_page(viewer: Option<&User>, notice: Option<&Notice>) -> Html<String> {
    let body = format!(
        r#"<h1>Login</h1>
{}
<form method="post" action="/login">
<label>Username <input type="text" name="username"></label>
<label>Password <input type="password" name="password"></label>
<label><input type="checkbox" name="remember_me"> Remember me</label>
<button type="submit">Login</button>
</form>"#,
        notice_html(notice)
    );

    layout("Login", viewer, &body)
}

pub fn register_page(viewer: Option<&User>, notice: Option<&Notice>) -> Html<String> {
    let body = format!(
        r#"<h1>Register</h1>
{}
<form method="post" action="/register">
<label>Username <input type="text" name="username" maxlength="80"></label>
<label>Password <input type="password" name="password"></label>
<button type="submit">Register</button>
</form>"#,
        notice_html(notice)
    );

    layout("Register", viewer, &body)
}

pub fn error_page(status: StatusCode) -> Html<String> {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>Something went wrong while handling this request.</p>",
        status.as_u16(),
        text(reason)
    );
    layout(reason, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
        }
    }

    fn widget() -> Product {
        Product {
            id: 7,
            name: "Widget".to_string(),
            price: 9.99,
            description: "A widget".to_string(),
            owner: 1,
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let product = Product {
            name: "<script>alert(1)</script>".to_string(),
            description: "\"quoted\" & more".to_string(),
            ..widget()
        };

        let Html(page) = products_page(None, &[product]);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("&amp; more"));
    }

    #[test]
    fn test_form_values_are_attribute_escaped() {
        let fields = ProductFields {
            name: Some("a\"b".to_string()),
            price: Some("1".to_string()),
            description: Some("</textarea>".to_string()),
        };

        let Html(page) = add_product_page(&alice(), &fields, None);
        assert!(page.contains("value=\"a&quot;b\""));
        assert!(!page.contains("</textarea></textarea>"));
    }

    #[test]
    fn test_price_uses_two_decimals() {
        let Html(page) = product_page(None, Some(&widget()));
        assert!(page.contains("9.99"));

        let product = Product {
            price: 10.0,
            ..widget()
        };
        let Html(page) = product_page(None, Some(&product));
        assert!(page.contains("10.00"));
    }

    #[test]
    fn test_missing_product_renders_empty_page() {
        let Html(page) = product_page(None, None);
        assert!(page.contains("<dd class=\"price\"></dd>"));
    }

    #[test]
    fn test_home_switches_on_viewer() {
        let Html(landing) = home_page(None, &[]);
        assert!(landing.contains("create an account"));

        let Html(page) = home_page(Some(&alice()), &[widget()]);
        assert!(page.contains("Welcome, alice"));
        assert!(page.contains("Widget"));
        assert!(page.contains("/logout"));
    }

    #[test]
    fn test_notice_rendering() {
        let Html(page) = login_page(None, Some(&Notice::error("Incorrect password")));
        assert!(page.contains(r#"<p class="error">Incorrect password</p>"#));

        let Html(page) = register_page(Some(&alice()), Some(&Notice::success("User created")));
        assert!(page.contains(r#"<p class="success">User created</p>"#));
    }

    #[test]
    fn test_error_page_is_generic() {
        let Html(page) = error_page(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(page.contains("500 Internal Server Error"));
        assert!(page.contains("Something went wrong"));
        assert!(!page.contains("Database error"));
    }
}
