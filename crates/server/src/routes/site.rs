use axum::extract::State;
use axum::Json;

use common::types::Health;
use configs::SiteConfig;

use super::auth::ServerState;

// canonical pages exposed to crawlers, relative to the site base url
const SITE_PAGES: &[&str] = &["", "services", "faq", "contact"];

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn robots_txt(State(state): State<ServerState>) -> String {
    render_robots(&state.config.site)
}

pub async fn sitemap_xml(State(state): State<ServerState>) -> ([(&'static str, &'static str); 1], String) {
    ([("content-type", "application/xml")], render_sitemap(&state.config.site))
}

fn base_url(site: &SiteConfig) -> String {
    site.base_url.trim_end_matches('/').to_string()
}

fn render_robots(site: &SiteConfig) -> String {
    let base = base_url(site);
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\n\nSitemap: {base}/sitemap.xml\n"
    )
}

fn render_sitemap(site: &SiteConfig) -> String {
    let base = base_url(site);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in SITE_PAGES {
        let loc = if page.is_empty() { base.clone() } else { format!("{base}/{page}") };
        xml.push_str(&format!("  <url><loc>{loc}</loc></url>\n"));
    }
    xml.push_str("</urlset>\n");
    xml
}
