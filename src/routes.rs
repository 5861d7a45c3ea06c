//! Grouping of crawled pages by their first path segment.

use indexmap::IndexMap;
use url::Url;

/// Pages shown per route group.
pub const GROUP_LIMIT: usize = 8;

/// Pages sharing a first path segment, in first-seen order.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteGroup<'a, P> {
    /// `/segment`, or `/` for the root.
    pub route: String,
    /// Group members, capped at [`GROUP_LIMIT`].
    pub pages: Vec<&'a P>,
    /// Members beyond the cap.
    pub hidden: usize,
}

impl<P> RouteGroup<'_, P> {
    pub fn is_root(&self) -> bool {
        self.route == "/"
    }

    /// Heading shown above the group's rows.
    pub fn display_name(&self) -> String {
        if self.is_root() {
            "/ (root)".to_owned()
        } else {
            self.route.clone()
        }
    }
}

/// Path of `url` without trailing slashes; `/` for the root or an empty path.
///
/// Relative inputs are treated as paths with any query or fragment removed.
pub fn route_path(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_owned(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{}", trimmed)
    }
}

/// `/a/b/c` becomes `/a`; the root stays `/`.
pub fn first_segment(path: &str) -> String {
    match path.trim_start_matches('/').split('/').next() {
        Some(segment) if !segment.is_empty() => format!("/{}", segment),
        _ => "/".to_owned(),
    }
}

/// Buckets `pages` by the first segment of their URL, keeping first-seen order.
pub fn group_pages<'a, P, F>(pages: &'a [P], url_of: F) -> Vec<RouteGroup<'a, P>>
where
    F: Fn(&P) -> &str,
{
    let mut groups: IndexMap<String, Vec<&'a P>> = IndexMap::new();
    for page in pages {
        let route = first_segment(&route_path(url_of(page)));
        groups.entry(route).or_default().push(page);
    }
    groups
        .into_iter()
        .map(|(route, mut members)| {
            let hidden = members.len().saturating_sub(GROUP_LIMIT);
            members.truncate(GROUP_LIMIT);
            RouteGroup {
                route,
                pages: members,
                hidden,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls<'a>(group: &RouteGroup<'_, &'a str>) -> Vec<&'a str> {
        group.pages.iter().map(|page| **page).collect()
    }

    #[test]
    fn route_path_normalises_urls() {
        assert_eq!(route_path("https://example.com"), "/");
        assert_eq!(route_path("https://example.com/"), "/");
        assert_eq!(route_path("https://example.com/blog/post/?a=1#top"), "/blog/post");
        assert_eq!(route_path("/about/"), "/about");
        assert_eq!(route_path("docs/start"), "/docs/start");
        assert_eq!(route_path(""), "/");
    }

    #[test]
    fn groups_by_first_segment_in_first_seen_order() {
        let pages = ["/blog/a", "/blog/b", "/about", "/"];
        let groups = group_pages(&pages, |page| *page);

        let routes: Vec<_> = groups.iter().map(|group| group.route.as_str()).collect();
        assert_eq!(routes, ["/blog", "/about", "/"]);
        assert_eq!(urls(&groups[0]), ["/blog/a", "/blog/b"]);
        assert_eq!(urls(&groups[1]), ["/about"]);
        assert_eq!(urls(&groups[2]), ["/"]);
        assert_eq!(groups[2].display_name(), "/ (root)");
    }

    #[test]
    fn absolute_and_relative_urls_share_groups() {
        let pages = ["https://site.io/blog/x", "/blog/y", "https://site.io/"];
        let groups = group_pages(&pages, |page| *page);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].pages.len(), 2);
        assert!(groups[1].is_root());
    }

    #[test]
    fn groups_are_capped() {
        let pages: Vec<String> = (0..11).map(|i| format!("/docs/{}", i)).collect();
        let groups = group_pages(&pages, |page| page.as_str());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].pages.len(), GROUP_LIMIT);
        assert_eq!(groups[0].hidden, 3);
        assert_eq!(groups[0].pages[7], &pages[7]);
    }
}
