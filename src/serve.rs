//! Local preview server for the interactive listing.
//!
//! Built on `tiny_http`. The record store is loaded once and shared read-only
//! across request handlers; every response is rendered on demand.
//!
//! # Routes
//!
//! | Path                     | Response                                   |
//! |--------------------------|--------------------------------------------|
//! | `/`, `/index.html`       | listing page, query string → `QueryState`  |
//! | `/papers/{id}.html`      | detail page (404 unknown id, 422 no url)   |
//! | `/{feed path}`           | rss feed                                   |
//! | anything else            | static file from the output directory      |
//!
//! ```text
//! ┌─────────────────┐  request   ┌──────────────────┐
//! │   Main Thread   │ ─────────▶ │   rayon worker   │
//! │  (accept loop)  │            │  route + render  │
//! └─────────────────┘            └────────┬─────────┘
//!                                         │ borrows
//!                                         ▼
//!                                 Arc<RecordStore>
//! ```

use crate::{
    catalog::RecordStore,
    config::SiteConfig,
    log,
    query::{QueryState, filter},
    render::{
        PAGES_DIR, SiteInfo,
        detail::render_detail,
        escape::escape_markup,
        feed::{FeedChannel, render_feed},
        listing::render_listing,
    },
};
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use std::{
    fmt::Write,
    fs,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Everything a request handler reads. Immutable once the server starts.
struct Catalog {
    store: Arc<RecordStore>,
    site: SiteInfo,
    channel: FeedChannel,
    output: PathBuf,
}

/// Start the preview server and block until Ctrl+C.
pub fn serve_catalog(config: &SiteConfig, store: RecordStore) -> Result<()> {
    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid [serve.interface] `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut channel = FeedChannel::from_config(config, Utc::now());
    // The bound port may differ from the configured one.
    channel.base_url = local_base_url(addr);

    let catalog = Arc::new(Catalog {
        store: Arc::new(store),
        site: config.site_info(),
        channel,
        output: config.build.output.clone(),
    });

    log!("serve"; "{} ({} papers)", catalog.channel.base_url, catalog.store.len());

    for request in server.incoming_requests() {
        let catalog = Arc::clone(&catalog);
        rayon::spawn(move || {
            if let Err(e) = handle_request(request, &catalog) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Base URL for links served back to clients.
///
/// A wildcard bind (`0.0.0.0`, `::`) is not reachable as a host, so links
/// point at loopback instead.
fn local_base_url(addr: SocketAddr) -> String {
    let host = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(host, addr.port()))
}

// ============================================================================
// Request Handling
// ============================================================================

/// A fully rendered response, independent of the transport.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into_bytes(),
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into().into_bytes(),
        }
    }

    fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }
}

fn handle_request(request: Request, catalog: &Catalog) -> Result<()> {
    let reply = route(request.url(), catalog);
    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", reply.content_type))?;

    let response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

/// Resolve a request target (path plus optional query string) to a reply.
fn route(url: &str, catalog: &Catalog) -> Reply {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let path = path.trim_matches('/');

    if path.is_empty() || path == "index.html" {
        let query = QueryState::from_query_string(query);
        return Reply::html(render_index(&catalog.store, &query, &catalog.site));
    }

    if let Some(id) = path
        .strip_prefix(PAGES_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.strip_suffix(".html"))
    {
        return serve_detail(id, catalog);
    }

    if path == catalog.channel.feed_path.trim_matches('/') {
        let channel = FeedChannel {
            build_date: Utc::now(),
            ..catalog.channel.clone()
        };
        return Reply {
            status: 200,
            content_type: "application/rss+xml; charset=utf-8",
            body: render_feed(catalog.store.records(), &channel).into_bytes(),
        };
    }

    serve_static(&catalog.output, path)
}

fn serve_detail(id: &str, catalog: &Catalog) -> Reply {
    let Some(record) = catalog.store.get(id) else {
        return Reply::not_found();
    };

    match render_detail(record, &catalog.site) {
        Ok(html) => Reply::html(html),
        Err(e) => {
            log!("skip"; "{e}");
            Reply::text(422, e.to_string())
        }
    }
}

/// Serve a file from the output directory (stylesheets, about pages, ...).
fn serve_static(root: &Path, request_path: &str) -> Reply {
    let relative = Path::new(request_path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Reply::not_found();
    }

    let path = root.join(relative);
    match fs::read(&path) {
        Ok(body) if path.is_file() => Reply {
            status: 200,
            content_type: guess_content_type(&path),
            body,
        },
        _ => Reply::not_found(),
    }
}

/// Guess MIME content type from file extension.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Listing Page
// ============================================================================

/// Full listing page: search form with facet selectors, then the results.
fn render_index(store: &RecordStore, query: &QueryState, site: &SiteInfo) -> String {
    let filtered = filter(store.records(), query);
    let view = render_listing(&filtered, store.len());
    if !query.is_unconstrained() {
        log!("serve"; "{:?} matched {}", query.search, view.summary);
    }

    let years: Vec<(String, String)> = store
        .years()
        .into_iter()
        .map(|y| (y.to_string(), y.to_string()))
        .collect();
    let methodologies: Vec<(String, String)> = store
        .methodologies()
        .into_iter()
        .map(|m| (m.clone(), m))
        .collect();
    let tags: Vec<(String, String)> = store
        .tags()
        .into_iter()
        .map(|t| (t.value, t.label))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{site_title}</title>
  <link rel="stylesheet" href="css/styles.css">
</head>
<body>
  <header>
    <div class="container">
      <a href="index.html" class="logo">{site_title}</a>
    </div>
  </header>

  <main>
    <div class="container">
      <form class="search-section" method="get" action="index.html">
        <input type="search" id="search-input" name="search" value="{search}" placeholder="Search papers...">
        <div class="filters">
{year_select}{methodology_select}{tag_select}          <button type="submit" class="btn">Filter</button>
        </div>
      </form>

      <div id="results">
{results}      </div>
    </div>
  </main>

  <footer>
    <div class="container">
      <p>&copy; {copyright}</p>
    </div>
  </footer>
</body>
</html>
"#,
        site_title = escape_markup(&site.title),
        search = escape_markup(&query.search),
        year_select = render_select("year", "All Years", &years, query.year.as_deref()),
        methodology_select = render_select(
            "methodology",
            "All Methods",
            &methodologies,
            query.methodology.as_deref()
        ),
        tag_select = render_select("tag", "All Topics", &tags, query.tag.as_deref()),
        results = view.to_html(),
        copyright = escape_markup(&site.copyright),
    )
}

/// A `<select>` whose first option clears the filter.
fn render_select(
    name: &str,
    placeholder: &str,
    options: &[(String, String)],
    selected: Option<&str>,
) -> String {
    let mut html = format!(
        "          <select id=\"{name}-filter\" name=\"{name}\">\n            <option value=\"\">{placeholder}</option>\n"
    );
    for (value, label) in options {
        let attr = if selected == Some(value.as_str()) { " selected" } else { "" };
        let _ = writeln!(
            html,
            "            <option value=\"{}\"{attr}>{}</option>",
            escape_markup(value),
            escape_markup(label)
        );
    }
    html.push_str("          </select>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::PaperRecord, utils::date::parse_timestamp};

    fn catalog(output: PathBuf) -> Catalog {
        let mut no_url = PaperRecord::sample("no-url", "2024-01-01");
        no_url.url = None;
        let mut policy = PaperRecord::sample("policy", "2023-06-01");
        policy.year = 2023;
        policy.title = "Policy Response to Automation".into();
        policy.tags = vec!["policy-response".into()];
        policy.methodology = "theoretical".into();

        let store = RecordStore::from_records(vec![
            PaperRecord::sample("robots", "2024-03-01"),
            policy,
            no_url,
        ])
        .unwrap();

        Catalog {
            store: Arc::new(store),
            site: SiteInfo::sample(),
            channel: FeedChannel {
                title: "AI Labor Research".into(),
                description: "Papers".into(),
                base_url: "http://127.0.0.1:5277".into(),
                feed_path: "feed.xml".into(),
                language: "en-us".into(),
                limit: 20,
                build_date: parse_timestamp("2024-06-01T00:00:00Z").unwrap(),
            },
            output,
        }
    }

    fn body(reply: &Reply) -> &str {
        std::str::from_utf8(&reply.body).unwrap()
    }

    #[test]
    fn test_index_lists_everything() {
        let catalog = catalog(PathBuf::from("missing"));
        let reply = route("/", &catalog);

        assert_eq!(reply.status, 200);
        assert!(body(&reply).contains("Showing all 3 papers"));
        assert!(body(&reply).contains("<option value=\"2023\">2023</option>"));
        assert!(body(&reply).contains("<option value=\"policy-response\">policy response</option>"));
    }

    #[test]
    fn test_index_applies_query() {
        let catalog = catalog(PathBuf::from("missing"));
        let reply = route("/index.html?search=POLICY+response&year=2023", &catalog);
        let html = body(&reply);

        assert!(html.contains("Showing 1 of 3 papers"));
        assert!(html.contains("href=\"papers/policy.html\""));
        assert!(html.contains("value=\"POLICY response\""));
        assert!(html.contains("<option value=\"2023\" selected>2023</option>"));
    }

    #[test]
    fn test_index_empty_state() {
        let catalog = catalog(PathBuf::from("missing"));
        let html = body(&route("/?tag=nothing", &catalog)).to_string();

        assert!(html.contains("Showing 0 of 3 papers"));
        assert!(html.contains("empty-state"));
    }

    #[test]
    fn test_detail_routes() {
        let catalog = catalog(PathBuf::from("missing"));

        let ok = route("/papers/robots.html", &catalog);
        assert_eq!(ok.status, 200);
        assert!(body(&ok).contains("<h1 class=\"paper-detail-title\">Paper robots</h1>"));

        assert_eq!(route("/papers/unknown.html", &catalog).status, 404);

        let unrenderable = route("/papers/no-url.html", &catalog);
        assert_eq!(unrenderable.status, 422);
        assert!(body(&unrenderable).contains("`url`"));
    }

    #[test]
    fn test_feed_route() {
        let catalog = catalog(PathBuf::from("missing"));
        let reply = route("/feed.xml", &catalog);

        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/rss+xml; charset=utf-8");
        assert!(body(&reply).contains("http://127.0.0.1:5277/papers/robots.html"));
    }

    #[test]
    fn test_static_files_and_traversal() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/styles.css"), "body{}").unwrap();
        let catalog = catalog(dir.path().to_path_buf());

        let css = route("/css/styles.css", &catalog);
        assert_eq!(css.status, 200);
        assert_eq!(css.content_type, "text/css; charset=utf-8");
        assert_eq!(body(&css), "body{}");

        assert_eq!(route("/../secret.txt", &catalog).status, 404);
        assert_eq!(route("/css", &catalog).status, 404);
    }

    #[test]
    fn test_local_base_url() {
        let addr = |s: &str| s.parse::<SocketAddr>().unwrap();

        assert_eq!(local_base_url(addr("0.0.0.0:5277")), "http://127.0.0.1:5277");
        assert_eq!(local_base_url(addr("[::]:8080")), "http://[::1]:8080");
        assert_eq!(local_base_url(addr("192.168.1.20:5278")), "http://192.168.1.20:5278");
        assert_eq!(local_base_url(addr("127.0.0.1:5277")), "http://127.0.0.1:5277");
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("a.woff2")), "font/woff2");
        assert_eq!(guess_content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
