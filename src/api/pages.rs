//! HTML pages rendered by the route handlers.
//!
//! Every piece of text that comes from Spotify is escaped before it is
//! placed into markup.

use crate::{management::Comparison, types::Playlist, utils::escape_html};

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
li{margin:.25rem 0}.notice{color:#b00}nav{margin-bottom:1rem}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn nav() -> &'static str {
    "<nav><a href=\"/choose_playlists\">Choose playlists</a> | <a href=\"/logout\">Log out</a></nav>"
}

/// Checkbox form listing the user's playlists.
pub fn choose_playlists(playlists: &[Playlist], notice: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str(nav());
    body.push_str("<h1>Choose two playlists</h1>\n");

    if let Some(notice) = notice {
        body.push_str(&format!(
            "<p class=\"notice\">{}</p>\n",
            escape_html(notice)
        ));
    }

    if playlists.is_empty() {
        body.push_str("<p>You have no playlists.</p>\n");
        return layout("Choose playlists", &body);
    }

    body.push_str("<form method=\"post\" action=\"/choose_playlists\">\n<ul>\n");
    for playlist in playlists {
        body.push_str(&format!(
            "<li><label><input type=\"checkbox\" name=\"playlist\" value=\"{id}\"> {name}</label></li>\n",
            id = escape_html(&playlist.id),
            name = escape_html(&playlist.name),
        ));
    }
    body.push_str("</ul>\n<button type=\"submit\">Find duplicates</button>\n</form>");

    layout("Choose playlists", &body)
}

/// Songs shared by the two compared playlists.
pub fn duplicates(comparison: &Comparison) -> String {
    let mut body = String::new();
    body.push_str(nav());
    body.push_str(&format!(
        "<h1>Duplicates between {} and {}</h1>\n",
        escape_html(&comparison.first_name),
        escape_html(&comparison.second_name)
    ));

    if comparison.songs.is_empty() {
        body.push_str("<p>No duplicates found.</p>");
    } else {
        body.push_str(&format!(
            "<p>{} songs in both playlists:</p>\n<ul>\n",
            comparison.songs.len()
        ));
        for song in &comparison.songs {
            body.push_str(&format!("<li>{}</li>\n", escape_html(song)));
        }
        body.push_str("</ul>");
    }

    layout("Duplicates", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to start</a></p>",
        escape_html(message)
    );
    layout("Error", &body)
}
