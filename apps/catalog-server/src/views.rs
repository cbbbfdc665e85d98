//! HTML pages.
//!
//! Every page goes through [`layout`], which renders the pending flash
//! messages and a login or logout link.

use std::{collections::HashMap, fmt::Write};

use entities::{Category, Item};

/// Per-request data shared by every page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub flashes: Vec<String>,
    pub logged_in: bool,
}

/// Escapes text for use in HTML bodies and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Path of the category page.
pub fn category_path(category_name: &str) -> String {
    format!("/catalog/{}/", urlencoding::encode(category_name))
}

/// Path of the item detail page.
pub fn item_path(category_name: &str, item: &Item) -> String {
    format!(
        "/catalog/{}/{}/{}",
        urlencoding::encode(category_name),
        urlencoding::encode(&item.name),
        item.id
    )
}

fn layout(title: &str, ctx: &PageContext, body: &str) -> String {
    let mut flashes = String::new();
    if !ctx.flashes.is_empty() {
        flashes.push_str("<ul class=\"flashes\">");
        for message in &ctx.flashes {
            let _ = write!(flashes, "<li>{}</li>", escape(message));
        }
        flashes.push_str("</ul>");
    }

    let account = if ctx.logged_in {
        "<a href=\"/disconnect\">Logout</a>"
    } else {
        "<a href=\"/login\">Login</a>"
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title} - Catalog</title>\n</head>\n<body>\n<header><a href=\"/\">Catalog App</a> {account}</header>\n{flashes}\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn category_list(categories: &[Category]) -> String {
    let mut out = String::from("<ul class=\"categories\">");
    for category in categories {
        let _ = write!(
            out,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&category_path(&category.name)),
            escape(&category.name)
        );
    }
    out.push_str("</ul>");
    out
}

fn category_options(categories: &[Category], selected: Option<i64>) -> String {
    let mut out = String::new();
    for category in categories {
        let marker = if Some(category.id) == selected {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            category.id,
            marker,
            escape(&category.name)
        );
    }
    out
}

/// Front page: every category and the most recent items.
pub fn catalog_page(ctx: &PageContext, categories: &[Category], recent_items: &[Item]) -> String {
    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut latest = String::from("<ul class=\"latest-items\">");
    for item in recent_items {
        let category_name = names.get(&item.category_id).copied().unwrap_or_default();
        let _ = write!(
            latest,
            "<li><a href=\"{}\">{}</a> <em>({})</em></li>",
            escape(&item_path(category_name, item)),
            escape(&item.name),
            escape(category_name)
        );
    }
    latest.push_str("</ul>");

    let add_link = if ctx.logged_in {
        "<p><a href=\"/catalog/new-item\">Add Item</a></p>"
    } else {
        ""
    };

    let body = format!(
        "<section><h2>Categories</h2>{}</section>\n<section><h2>Latest Items</h2>{}{}</section>",
        category_list(categories),
        add_link,
        latest
    );
    layout("Catalog", ctx, &body)
}

/// Items of one category.
pub fn category_page(
    ctx: &PageContext,
    category_name: &str,
    categories: &[Category],
    items: &[Item],
) -> String {
    let mut list = String::from("<ul class=\"items\">");
    for item in items {
        let _ = write!(
            list,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&item_path(category_name, item)),
            escape(&item.name)
        );
    }
    list.push_str("</ul>");

    let body = format!(
        "<section><h2>Categories</h2>{}</section>\n<section><h2>{} Items ({})</h2>{}</section>",
        category_list(categories),
        escape(category_name),
        items.len(),
        list
    );
    layout(category_name, ctx, &body)
}

/// Item detail, with edit and delete links for the owner.
pub fn item_page(ctx: &PageContext, category_name: &str, item: &Item, owns_item: bool) -> String {
    let actions = if owns_item {
        format!(
            "<p><a href=\"/catalog/edit/{id}\">Edit</a> | <a href=\"/catalog/delete/{id}\">Delete</a></p>",
            id = item.id
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h2>{}</h2>\n<p class=\"category\">Category: <a href=\"{}\">{}</a></p>\n<p class=\"description\">{}</p>\n{}",
        escape(&item.name),
        escape(&category_path(category_name)),
        escape(category_name),
        escape(item.description.as_deref().unwrap_or_default()),
        actions
    );
    layout(&item.name, ctx, &body)
}

/// Form for a new item.
pub fn new_item_form(ctx: &PageContext, categories: &[Category]) -> String {
    let body = format!(
        "<h2>Add Item</h2>\n<form method=\"post\" action=\"/catalog/new-item\">\n<label>Name <input type=\"text\" name=\"item-name\"></label>\n<label>Description <textarea name=\"item-description\"></textarea></label>\n<label>Category <select name=\"categories-list\">{}</select></label>\n<button type=\"submit\">Create</button>\n</form>",
        category_options(categories, None)
    );
    layout("New Item", ctx, &body)
}

/// Form for editing an item. Empty fields keep their current value.
pub fn edit_item_form(ctx: &PageContext, item: &Item, categories: &[Category]) -> String {
    let body = format!(
        "<h2>Edit {name}</h2>\n<form method=\"post\" action=\"/catalog/edit/{id}\">\n<label>Name <input type=\"text\" name=\"item-name\" placeholder=\"{name}\"></label>\n<label>Description <textarea name=\"item-description\" placeholder=\"{description}\"></textarea></label>\n<label>Category <select name=\"categories-list\"><option value=\"\">(unchanged)</option>{options}</select></label>\n<button type=\"submit\">Save</button>\n</form>",
        name = escape(&item.name),
        id = item.id,
        description = escape(item.description.as_deref().unwrap_or_default()),
        options = category_options(categories, Some(item.category_id)),
    );
    layout("Edit Item", ctx, &body)
}

/// Delete confirmation with a cancel link back to `cancel_url`.
pub fn delete_confirm_page(ctx: &PageContext, item: &Item, cancel_url: &str) -> String {
    let body = format!(
        "<h2>Delete {name}?</h2>\n<form method=\"post\" action=\"/catalog/delete/{id}\">\n<button type=\"submit\">Delete</button>\n<a href=\"{cancel}\">Cancel</a>\n</form>",
        name = escape(&item.name),
        id = item.id,
        cancel = escape(cancel_url),
    );
    layout("Delete Item", ctx, &body)
}

/// Login page with the Google sign-in button.
///
/// The sign-in script posts the one-time code to `/gconnect?state=<state>`.
pub fn login_page(ctx: &PageContext, state: &str, client_id: &str) -> String {
    let body = format!(
        r#"<h2>Login</h2>
<div id="signinButton" data-state="{state}" data-clientid="{client_id}"></div>
<div id="result"></div>
<script src="https://ajax.googleapis.com/ajax/libs/jquery/1.8.2/jquery.min.js"></script>
<script src="https://apis.google.com/js/client:platform.js?onload=start" async defer></script>
<script>
function start() {{
  gapi.load('auth2', function() {{
    auth2 = gapi.auth2.init({{client_id: '{client_id}', scope: 'openid email'}});
  }});
}}
function signInCallback(authResult) {{
  if (authResult['code']) {{
    $('#signinButton').attr('style', 'display: none');
    $.ajax({{
      type: 'POST',
      url: '/gconnect?state={state}',
      processData: false,
      data: authResult['code'],
      contentType: 'application/octet-stream; charset=utf-8',
      success: function(result) {{
        if (result) {{
          $('#result').html(result + '<p>Redirecting...</p>');
          setTimeout(function() {{ window.location.href = "/"; }}, 3000);
        }}
      }}
    }});
  }} else {{
    $('#result').html('Failed to make a server-side call.');
  }}
}}
</script>"#,
        state = escape(state),
        client_id = escape(client_id),
    );
    layout("Login", ctx, &body)
}

/// Fragment returned to the sign-in script after a successful login.
pub fn welcome_fragment(name: &str, picture: Option<&str>) -> String {
    let mut out = format!("<h1>Welcome, {}!</h1>", escape(name));
    if let Some(picture) = picture {
        let _ = write!(
            out,
            "<img src=\"{}\" style=\"width: 300px; height: 300px; border-radius: 150px;\">",
            escape(picture)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            id: 4,
            name: "Ball & Pump".to_string(),
            description: Some("<b>Size 4</b>".to_string()),
            category_id: 1,
            user_id: 2,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }

    #[test]
    fn test_item_path_is_percent_encoded() {
        assert_eq!(item_path("Rock Climbing", &item()), "/catalog/Rock%20Climbing/Ball%20%26%20Pump/4");
    }

    #[test]
    fn test_flashes_rendered() {
        let ctx = PageContext {
            flashes: vec!["Item has been edited!".to_string()],
            logged_in: true,
        };
        let page = item_page(&ctx, "Soccer", &item(), true);
        assert!(page.contains("<li>Item has been edited!</li>"));
        assert!(page.contains("/disconnect"));
        assert!(page.contains("/catalog/edit/4"));
        assert!(page.contains("&lt;b&gt;Size 4&lt;/b&gt;"));
    }

    #[test]
    fn test_item_page_hides_actions_from_visitors() {
        let page = item_page(&PageContext::default(), "Soccer", &item(), false);
        assert!(!page.contains("/catalog/delete/4"));
        assert!(page.contains("href=\"/login\""));
    }

    #[test]
    fn test_login_page_embeds_state() {
        let page = login_page(&PageContext::default(), "ABC123", "client-1");
        assert!(page.contains("data-state=\"ABC123\""));
        assert!(page.contains("/gconnect?state=ABC123"));
    }
}
