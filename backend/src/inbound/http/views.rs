//! Minimal HTML view layer.
//!
//! Each page is a function from fetched entities to a string, wrapped in a
//! shared layout that renders the navigation and any pending flash messages.
//! Forms that need PUT or DELETE carry the verb in a `_method` query token on
//! their action; the method-override middleware rewrites them before routing.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

use crate::domain::{CommentView, Discussion, DiscussionThread, Error, User};

use super::session::{FlashKind, FlashMessage, SessionContext};

/// Data every page needs: the signed-in viewer and pending flash messages.
#[derive(Debug, Default)]
pub struct PageChrome {
    pub viewer: Option<String>,
    pub flash: Vec<FlashMessage>,
}

impl PageChrome {
    /// Read the viewer and drain queued flash messages from the session.
    pub fn from_session(session: &SessionContext) -> Result<Self, Error> {
        Ok(Self {
            viewer: session.username()?,
            flash: session.take_flash()?,
        })
    }
}

/// Wrap a rendered page body in a `200 OK` HTML response.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn flash_banners(flash: &[FlashMessage]) -> String {
    flash
        .iter()
        .map(|entry| {
            let class = match entry.kind {
                FlashKind::Success => "flash flash-success",
                FlashKind::Error => "flash flash-error",
            };
            format!("<p class=\"{class}\">{}</p>\n", escape(&entry.message))
        })
        .collect()
}

fn nav(viewer: Option<&str>) -> String {
    let account = match viewer {
        Some(name) => format!(
            "<span>Signed in as {}</span> <a href=\"/users/logout\">Log out</a>",
            escape(name)
        ),
        None => "<a href=\"/users/login\">Log in</a> <a href=\"/users/new\">Register</a>".to_owned(),
    };
    format!(
        "<nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> \
         <a href=\"/discussions\">Discussions</a> <a href=\"/users\">Users</a> {account}</nav>"
    )
}

fn layout(title: &str, chrome: &PageChrome, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{title} | Discussion Board</title></head>\n<body>\n{nav}\n{flash}<main>\n{body}\n\
         </main>\n</body>\n</html>\n",
        title = escape(title),
        nav = nav(chrome.viewer.as_deref()),
        flash = flash_banners(&chrome.flash),
    )
}

fn author_name(author: Option<&User>) -> String {
    author.map_or_else(|| "unknown".to_owned(), |user| escape(user.username().as_ref()))
}

/// Landing page.
pub fn home_page(chrome: &PageChrome) -> String {
    layout(
        "Home",
        chrome,
        "<h1>Discussion Board</h1>\n\
         <p>Register, start discussions, and join the conversation.</p>\n\
         <p><a href=\"/discussions\">Browse discussions</a></p>",
    )
}

/// Static about page.
pub fn about_page(chrome: &PageChrome) -> String {
    layout(
        "About",
        chrome,
        "<h1>About</h1>\n\
         <p>A small community board: every discussion belongs to a category, \
         carries tags, and collects comments from signed-in users.</p>",
    )
}

/// Login form.
pub fn login_page(chrome: &PageChrome) -> String {
    layout(
        "Log in",
        chrome,
        "<h1>Log in</h1>\n\
         <form method=\"post\" action=\"/users/login\">\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>",
    )
}

/// User index.
pub fn users_index_page(chrome: &PageChrome, users: &[User]) -> String {
    let rows: String = users
        .iter()
        .map(|user| {
            format!(
                "<li><a href=\"/users/{id}\">{name}</a></li>\n",
                id = user.id(),
                name = escape(user.username().as_ref()),
            )
        })
        .collect();
    let list = if rows.is_empty() {
        "<p>No users yet.</p>".to_owned()
    } else {
        format!("<ul>\n{rows}</ul>")
    };
    layout(
        "All Users",
        chrome,
        &format!("<h1>Users</h1>\n{list}\n<p><a href=\"/users/new\">Register</a></p>"),
    )
}

/// Registration form.
pub fn user_new_page(chrome: &PageChrome) -> String {
    layout(
        "New User",
        chrome,
        "<h1>Register</h1>\n\
         <form method=\"post\" action=\"/users/create\">\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Create account</button>\n\
         </form>",
    )
}

/// User detail page; a missing user renders a placeholder body.
pub fn user_show_page(chrome: &PageChrome, user: Option<&User>) -> String {
    let Some(user) = user else {
        return layout("User Details", chrome, "<p>User not found.</p>");
    };
    let body = format!(
        "<h1>{name}</h1>\n\
         <p>Joined {joined}</p>\n\
         <p><a href=\"/users/{id}/edit\">Edit</a></p>\n\
         <form method=\"post\" action=\"/users/{id}/delete?_method=DELETE\">\
         <button type=\"submit\">Delete account</button></form>",
        name = escape(user.username().as_ref()),
        joined = user.created_at().format("%Y-%m-%d"),
        id = user.id(),
    );
    layout("User Details", chrome, &body)
}

/// User edit form; a missing user renders a placeholder body.
pub fn user_edit_page(chrome: &PageChrome, user: Option<&User>) -> String {
    let Some(user) = user else {
        return layout("Edit User", chrome, "<p>User not found.</p>");
    };
    let body = format!(
        "<h1>Edit {name}</h1>\n\
         <form method=\"post\" action=\"/users/{id}/update?_method=PUT\">\n\
         <label>Username <input name=\"username\" value=\"{name}\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>",
        name = escape(user.username().as_ref()),
        id = user.id(),
    );
    layout("Edit User", chrome, &body)
}

/// Discussion index.
pub fn discussions_index_page(chrome: &PageChrome, discussions: &[Discussion]) -> String {
    let rows: String = discussions
        .iter()
        .map(|discussion| {
            format!(
                "<li><a href=\"/discussions/{id}\">{title}</a> \
                 <span class=\"category\">{category}</span> \
                 <span class=\"comments\">{count} comments</span></li>\n",
                id = discussion.id,
                title = escape(&discussion.title),
                category = escape(&discussion.category),
                count = discussion.comments.len(),
            )
        })
        .collect();
    let list = if rows.is_empty() {
        "<p>No discussions yet. Start the first one!</p>".to_owned()
    } else {
        format!("<ul>\n{rows}</ul>")
    };
    layout(
        "All Discussions",
        chrome,
        &format!(
            "<h1>Discussions</h1>\n{list}\n\
             <p><a href=\"/discussions/new\">New discussion</a></p>"
        ),
    )
}

fn discussion_fields(title: &str, description: &str, category: &str, tags: &str) -> String {
    format!(
        "<label>Title <input name=\"title\" value=\"{title}\" required></label>\n\
         <label>Description <textarea name=\"description\" required>{description}</textarea></label>\n\
         <label>Category <input name=\"category\" value=\"{category}\" required></label>\n\
         <label>Tags <input name=\"tags\" value=\"{tags}\" placeholder=\"comma, separated\"></label>\n",
        title = escape(title),
        description = escape(description),
        category = escape(category),
        tags = escape(tags),
    )
}

/// Discussion creation form.
pub fn discussion_new_page(chrome: &PageChrome) -> String {
    let body = format!(
        "<h1>New Discussion</h1>\n\
         <form method=\"post\" action=\"/discussions/create\">\n{fields}\
         <button type=\"submit\">Create discussion</button>\n</form>",
        fields = discussion_fields("", "", "", ""),
    );
    layout("New Discussion", chrome, &body)
}

/// Discussion edit form; a missing discussion renders a placeholder body.
pub fn discussion_edit_page(chrome: &PageChrome, discussion: Option<&Discussion>) -> String {
    let Some(discussion) = discussion else {
        return layout("Edit Discussion", chrome, "<p>Discussion not found.</p>");
    };
    let body = format!(
        "<h1>Edit {title}</h1>\n\
         <form method=\"post\" action=\"/discussions/{id}/update?_method=PUT\">\n{fields}\
         <button type=\"submit\">Save</button>\n</form>",
        title = escape(&discussion.title),
        id = discussion.id,
        fields = discussion_fields(
            &discussion.title,
            &discussion.description,
            &discussion.category,
            &discussion.tags.join(", "),
        ),
    );
    layout("Edit Discussion", chrome, &body)
}

/// Discussion detail page with comments, their authors, and the comment form.
pub fn discussion_show_page(chrome: &PageChrome, thread: Option<&DiscussionThread>) -> String {
    let Some(thread) = thread else {
        return layout("Discussion Details", chrome, "<p>Discussion not found.</p>");
    };
    let discussion = &thread.discussion;

    let comment_items: String = thread
        .comments
        .iter()
        .map(|entry| {
            format!(
                "<li><p>{content}</p>\
                 <p class=\"byline\">by {author} on {when}</p>\
                 <form method=\"post\" action=\"/comments/{id}/delete?_method=DELETE\">\
                 <button type=\"submit\">Delete</button></form></li>\n",
                content = escape(&entry.comment.content),
                author = author_name(entry.author.as_ref()),
                when = entry.comment.created_at.format("%Y-%m-%d %H:%M"),
                id = entry.comment.id,
            )
        })
        .collect();
    let comments = if comment_items.is_empty() {
        "<p>No comments yet.</p>".to_owned()
    } else {
        format!("<ul>\n{comment_items}</ul>")
    };

    let body = format!(
        "<h1>{title}</h1>\n\
         <p class=\"byline\">by {author} in {category}</p>\n\
         <p>{description}</p>\n\
         <p class=\"tags\">Tags: {tags}</p>\n\
         <p><a href=\"/discussions/{id}/edit\">Edit</a></p>\n\
         <form method=\"post\" action=\"/discussions/{id}/delete?_method=DELETE\">\
         <button type=\"submit\">Delete discussion</button></form>\n\
         <h2>Comments</h2>\n{comments}\n\
         <form method=\"post\" action=\"/comments/create\">\n\
         <input type=\"hidden\" name=\"discussion\" value=\"{id}\">\n\
         <label>Add a comment <textarea name=\"content\" required></textarea></label>\n\
         <button type=\"submit\">Comment</button>\n</form>",
        title = escape(&discussion.title),
        author = author_name(thread.author.as_ref()),
        category = escape(&discussion.category),
        description = escape(&discussion.description),
        tags = escape(&discussion.tags.join(", ")),
        id = discussion.id,
    );
    layout("Discussion Details", chrome, &body)
}

/// Comment detail page; a missing comment renders a placeholder body.
pub fn comment_show_page(chrome: &PageChrome, view: Option<&CommentView>) -> String {
    let Some(view) = view else {
        return layout("Comment Details", chrome, "<p>Comment not found.</p>");
    };
    let body = format!(
        "<h1>Comment</h1>\n\
         <p>{content}</p>\n\
         <p class=\"byline\">by {author}</p>\n\
         <p><a href=\"/discussions/{discussion}\">Back to discussion</a></p>\n\
         <form method=\"post\" action=\"/comments/{id}/delete?_method=DELETE\">\
         <button type=\"submit\">Delete</button></form>",
        content = escape(&view.comment.content),
        author = author_name(view.author.as_ref()),
        discussion = view.comment.discussion,
        id = view.comment.id,
    );
    layout("Comment Details", chrome, &body)
}

/// Generic error page used by the error adapter.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{code} {reason} | Discussion Board</title></head>\n<body>\n\
         <h1>{code} {reason}</h1>\n<p>{message}</p>\n\
         <p><a href=\"/\">Back to the board</a></p>\n</body>\n</html>\n",
        code = status.as_u16(),
        message = escape(message),
    )
}

/// Body for the unmatched-route terminal handler.
pub fn not_found_page() -> String {
    error_page(StatusCode::NOT_FOUND, "That page does not exist.")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{
        Comment, CommentId, DiscussionId, PasswordHash, ThreadComment, UserId, Username,
    };
    use chrono::Utc;

    fn chrome_with(viewer: Option<&str>, flash: Vec<FlashMessage>) -> PageChrome {
        PageChrome {
            viewer: viewer.map(ToOwned::to_owned),
            flash,
        }
    }

    fn sample_user(name: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            PasswordHash::new("#secret").expect("valid hash"),
            Utc::now(),
        )
    }

    fn sample_thread() -> DiscussionThread {
        let author = sample_user("ada");
        let discussion = Discussion {
            id: DiscussionId::random(),
            title: "Lifetimes & you".into(),
            description: "Sharing <tips>".into(),
            author: author.id(),
            category: "rust".into(),
            tags: vec!["borrowck".into()],
            comments: Vec::new(),
            created_at: Utc::now(),
        };
        let commenter = sample_user("grace");
        let comment = Comment {
            id: CommentId::random(),
            content: "Great thread".into(),
            author: commenter.id(),
            discussion: discussion.id,
            created_at: Utc::now(),
        };
        DiscussionThread {
            discussion,
            author: Some(author),
            comments: vec![ThreadComment {
                comment,
                author: Some(commenter),
            }],
        }
    }

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn layout_renders_flash_messages() {
        let chrome = chrome_with(
            None,
            vec![FlashMessage {
                kind: FlashKind::Error,
                message: "Something failed".into(),
            }],
        );
        let page = home_page(&chrome);
        assert!(page.contains("flash-error"));
        assert!(page.contains("Something failed"));
    }

    #[test]
    fn layout_shows_the_signed_in_viewer() {
        let page = home_page(&chrome_with(Some("ada"), Vec::new()));
        assert!(page.contains("Signed in as ada"));
        assert!(!page.contains("Register"));
    }

    #[test]
    fn discussion_show_escapes_content_and_names_comment_authors() {
        let page = discussion_show_page(&PageChrome::default(), Some(&sample_thread()));
        assert!(page.contains("Sharing &lt;tips&gt;"));
        assert!(page.contains("by grace"));
        assert!(page.contains("Great thread"));
    }

    #[test]
    fn discussion_show_handles_missing_discussions() {
        let page = discussion_show_page(&PageChrome::default(), None);
        assert!(page.contains("Discussion not found."));
    }

    #[test]
    fn edit_form_carries_the_method_override_token() {
        let thread = sample_thread();
        let page = discussion_edit_page(&PageChrome::default(), Some(&thread.discussion));
        assert!(page.contains(&format!(
            "/discussions/{}/update?_method=PUT",
            thread.discussion.id
        )));
        assert!(page.contains("value=\"borrowck\""));
    }

    #[test]
    fn error_page_escapes_the_message() {
        let page = error_page(StatusCode::BAD_REQUEST, "<oops>");
        assert!(page.contains("400 Bad Request"));
        assert!(page.contains("&lt;oops&gt;"));
    }
}
