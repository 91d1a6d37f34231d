//! Server-rendered console pages.

use crate::models::EntityKind;
use crate::ops::{ids, list_op_id, OpRegistry};
use crate::session::log::ERROR_CLASS;
use crate::session::Session;

use super::element::{make_data, make_div, make_row, make_table, make_text, Element, Node};

const STYLE: &str = "body{font-family:sans-serif;margin:1em}\
form{display:inline-block;vertical-align:top;border:1px solid #ccc;padding:.5em;margin:.25em}\
.v-table td,.v-table th{border:1px solid #ddd;padding:2px 6px}\
.v-id{font-family:monospace}\
#DEBUGG{font-family:monospace;font-size:smaller;border-top:1px solid #999;margin-top:1em}\
.v-errorText{color:#b00}";

enum FieldKind {
    Text,
    Password,
    Checkbox,
    TextArea,
}

struct FormField {
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FormField {
    FormField { name, label, kind }
}

struct FormSpec {
    op: &'static str,
    title: &'static str,
    fields: &'static [FormField],
}

const CREDENTIALS: &[FormField] = &[
    field("username", "username", FieldKind::Text),
    field("password", "password", FieldKind::Password),
];

const ACCOUNT_FORMS: &[FormSpec] = &[
    FormSpec {
        op: ids::SET_SERVER,
        title: "Server",
        fields: &[field("server-url", "server URL", FieldKind::Text)],
    },
    FormSpec { op: ids::LOGIN, title: "Login", fields: CREDENTIALS },
    FormSpec {
        op: ids::CREATE_ACCOUNT,
        title: "Create account",
        fields: &[
            field("username", "username", FieldKind::Text),
            field("password", "password", FieldKind::Password),
            field("email", "email", FieldKind::Text),
        ],
    },
    FormSpec { op: ids::DOMAIN_TOKEN, title: "Domain token", fields: CREDENTIALS },
];

const ACTION_FORMS: &[FormSpec] = &[
    FormSpec {
        op: ids::DELETE_ACCOUNT,
        title: "Delete account",
        fields: &[field("id", "accountId", FieldKind::Text)],
    },
    FormSpec {
        op: ids::DELETE_DOMAIN,
        title: "Delete domain",
        fields: &[field("id", "domainId", FieldKind::Text)],
    },
    FormSpec {
        op: ids::DELETE_PLACE,
        title: "Delete place",
        fields: &[field("id", "placeId", FieldKind::Text)],
    },
    FormSpec {
        op: ids::DELETE_TOKEN,
        title: "Delete token",
        fields: &[
            field("account-id", "accountId", FieldKind::Text),
            field("token-id", "tokenId", FieldKind::Text),
        ],
    },
    FormSpec {
        op: ids::RAW_MAINT,
        title: "Maintenance raw read",
        fields: &[
            field("collection", "collection", FieldKind::Text),
            field("field", "field", FieldKind::Text),
            field("value", "value", FieldKind::Text),
        ],
    },
    FormSpec {
        op: ids::RAW_GET,
        title: "Raw GET",
        fields: &[
            field("path", "path", FieldKind::Text),
            field("inject-error", "force error path", FieldKind::Checkbox),
        ],
    },
    FormSpec {
        op: ids::RAW_POST,
        title: "Raw POST",
        fields: &[
            field("path", "path", FieldKind::Text),
            field("body", "JSON body", FieldKind::TextArea),
            field("inject-error", "force error path", FieldKind::Checkbox),
        ],
    },
];

fn op_form(op: &str, title: &str, fields: &[FormField]) -> Element {
    let mut form = Element::new("form")
        .attr("method", "post")
        .attr("action", "/op")
        .child(Element::new("div").with_class("v-form-title").child(title))
        .child(Element::new("input").attr("type", "hidden").attr("name", "op").attr("value", op));

    for f in fields {
        let control = match f.kind {
            FieldKind::Text => Element::new("input").attr("type", "text").attr("name", f.name),
            FieldKind::Password => Element::new("input").attr("type", "password").attr("name", f.name),
            FieldKind::Checkbox => Element::new("input").attr("type", "checkbox").attr("name", f.name),
            FieldKind::TextArea => Element::new("textarea").attr("name", f.name).attr("rows", "4"),
        };
        form.push(Element::new("label").child(format!("{} ", f.label)).child(control));
        form.push(Element::new("br"));
    }

    form.child(Element::new("button").attr("type", "submit").child(title))
}

fn list_form(registry: &OpRegistry) -> Element {
    let mut form = Element::new("form")
        .attr("method", "post")
        .attr("action", "/op")
        .child(Element::new("div").with_class("v-form-title").child("Lists"))
        .child(
            Element::new("label")
                .child("as admin ")
                .child(Element::new("input").attr("type", "checkbox").attr("name", "as-admin")),
        )
        .child(Element::new("br"));

    for kind in EntityKind::ALL {
        let op = list_op_id(kind);
        if registry.contains(op) {
            form.push(
                Element::new("button")
                    .attr("type", "submit")
                    .attr("name", "op")
                    .attr("value", op)
                    .child(kind.to_string()),
            );
        }
    }
    form
}

fn forms(specs: &[FormSpec], registry: &OpRegistry) -> Vec<Node> {
    specs
        .iter()
        .filter(|s| registry.contains(s.op))
        .map(|s| op_form(s.op, s.title, s.fields).into())
        .collect()
}

fn status_table(session: &Session) -> Element {
    let login = session.login_user().unwrap_or("(not logged in)");
    let account = session.token().map(|t| t.account_id.as_str()).unwrap_or("");
    let rows = vec![
        make_row(vec![make_data("server", ""), make_data(session.server_url(), "v-server-url")], ""),
        make_row(vec![make_data("user", ""), make_data(login, "v-loggedin-username")], ""),
        make_row(vec![make_data("accountId", ""), make_data(account, "v-loggedin-accountid")], ""),
        make_row(
            vec![make_data("domain token", ""), make_data(session.domain_token().unwrap_or(""), "v-domain-token")],
            "",
        ),
    ];
    make_table(rows, "v-status-table")
}

/// The rolling console log, oldest line first.
pub fn log_panel(session: &Session) -> Element {
    let lines: Vec<Node> = session
        .log
        .lines()
        .map(|l| {
            let class = if l.is_error { ERROR_CLASS } else { "" };
            make_div(
                vec![make_text(format!("{} {}", l.timestamp.format("%H:%M:%S"), l.message))],
                class,
            )
            .into()
        })
        .collect();
    make_div(lines, "").attr("id", "DEBUGG")
}

fn document(title: &str, head_extra: Vec<Element>, body: Vec<Node>) -> String {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("title").child(title))
        .children(head_extra)
        .child(Element::new("style").child(STYLE));
    let html = Element::new("html")
        .child(head)
        .child(Element::new("body").children(body));
    format!("<!DOCTYPE html>\n{}", html.to_html())
}

/// Full console page for `session`.
pub fn console_page(session: &Session, registry: &OpRegistry) -> String {
    let mut account_forms = forms(ACCOUNT_FORMS, registry);
    account_forms.push(list_form(registry).into());

    let display = match &session.view {
        Some(view) => make_div(vec![view.clone().into()], "").attr("id", "v-table-list"),
        None => make_div(Vec::new(), "").attr("id", "v-table-list"),
    };

    let body: Vec<Node> = vec![
        Element::new("h1").child("Iamus Console").into(),
        status_table(session).into(),
        make_div(account_forms, "v-forms").into(),
        make_div(forms(ACTION_FORMS, registry), "v-forms").into(),
        Element::new("p").child(Element::new("a").attr("href", "/stats").child("OS statistics")).into(),
        display.into(),
        log_panel(session).into(),
    ];

    document("Iamus Console", Vec::new(), body)
}

/// Statistics page; reloads itself every `refresh_secs`.
pub fn stats_page(session: &Session, stats: Option<Element>, refresh_secs: u64) -> String {
    let content = stats.unwrap_or_else(|| {
        Element::new("p").child(if session.is_logged_in() {
            "Statistics unavailable."
        } else {
            "Log in to see statistics."
        })
    });

    let body: Vec<Node> = vec![
        Element::new("h1").child("OS statistics").into(),
        Element::new("p").child(Element::new("a").attr("href", "/").child("back to console")).into(),
        make_div(vec![content.into()], "").attr("id", "v-stat-os-table-place").into(),
        log_panel(session).into(),
    ];

    let refresh = Element::new("meta")
        .attr("http-equiv", "refresh")
        .attr("content", refresh_secs.to_string());
    document("Iamus Console: statistics", vec![refresh], body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_page_has_every_registered_form() {
        let registry = OpRegistry::standard();
        let session = Session::new("http://localhost:9400", 20);
        let html = console_page(&session, &registry);
        for id in registry.ids() {
            if id == ids::OS_STATS {
                continue;
            }
            assert!(html.contains(&format!("value=\"{}\"", id)), "no form for {}", id);
        }
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("(not logged in)"));
    }

    #[test]
    fn test_log_panel_marks_errors() {
        let mut session = Session::new("http://localhost:9400", 20);
        session.log.debug("hello");
        session.log.error("<bad>");
        let html = log_panel(&session).to_html();
        assert!(html.contains("class=\"v-errorText\""));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.starts_with("<div id=\"DEBUGG\">"));
    }

    #[test]
    fn test_stats_page_refreshes() {
        let session = Session::new("http://localhost:9400", 20);
        let html = stats_page(&session, None, 5);
        assert!(html.contains("http-equiv=\"refresh\" content=\"5\""));
        assert!(html.contains("Log in to see statistics."));
    }
}
