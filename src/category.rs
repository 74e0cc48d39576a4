//! Category listing pages: movie links and the "next page" link.

use scraper::{Html, Selector};
use url::Url;

/// Namespaces that never lead to articles (checked in hrefs)
const SERVICE_HREF_MARKERS: [&str; 4] = ["Категория:", "Служебная:", "Википедия:", "Шаблон:"];

/// Markers checked in the visible link text
const SERVICE_TEXT_MARKERS: [&str; 3] = ["Категория:", "Шаблон:", "Обсуждение:"];

/// Markers checked in the title attribute
const SERVICE_TITLE_MARKERS: [&str; 5] =
    ["Категория:", "Википедия:", "Служебная:", "Шаблон:", "Обсуждение:"];

const NEXT_PAGE_TEXT: &str = "Следующая страница";

/// A link from the listing to a candidate movie article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieLink {
    pub url: String,
    pub title: String,
}

/// Parsed category page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPage {
    pub movies: Vec<MovieLink>,
    pub next_page: Option<String>,
}

/// Parse a category listing. Relative links are resolved against `page_url`.
pub fn parse_category_page(page_url: &str, html: &str) -> CategoryPage {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let mut page = CategoryPage::default();

    if let Ok(selector) = Selector::parse("div#mw-pages li a") {
        for link in document.select(&selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let text: String = link.text().collect::<String>().trim().to_string();
            let title = link.value().attr("title").unwrap_or_default();

            if !is_movie_link(href, &text, title) {
                continue;
            }
            if let Some(url) = resolve(base.as_ref(), href) {
                page.movies.push(MovieLink {
                    url,
                    title: title.to_string(),
                });
            }
        }
    }

    if let Ok(selector) = Selector::parse("a[href]") {
        page.next_page = document
            .select(&selector)
            .find(|a| a.text().collect::<String>().contains(NEXT_PAGE_TEXT))
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve(base.as_ref(), href));
    }

    page
}

/// Listing filter: no service namespaces, and a title that looks like an article
fn is_movie_link(href: &str, text: &str, title: &str) -> bool {
    if SERVICE_HREF_MARKERS.iter().any(|m| href.contains(m)) {
        return false;
    }
    if SERVICE_TEXT_MARKERS.iter().any(|m| text.contains(m)) {
        return false;
    }
    if title.is_empty() || SERVICE_TITLE_MARKERS.iter().any(|m| title.contains(m)) {
        return false;
    }
    let lower = title.to_lowercase();
    lower.contains("фильм") || lower.contains("кино") || title.chars().count() > 3
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Url::parse(href).ok().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://ru.wikipedia.org/wiki/Категория:Фильмы_по_алфавиту";

    const LISTING_HTML: &str = r#"
<html><body>
<div id="mw-pages">
  <a href="/w/index.php?title=Категория:Фильмы_по_алфавиту&amp;pagefrom=Б">Следующая страница</a>
  <ul>
    <li><a href="/wiki/Солярис_(фильм,_1972)" title="Солярис (фильм, 1972)">Солярис (фильм, 1972)</a></li>
    <li><a href="/wiki/Ход" title="Ход">Ход</a></li>
    <li><a href="/wiki/Кин-дза-дза!" title="Кин-дза-дза!">Кин-дза-дза!</a></li>
    <li><a href="/wiki/Шаблон:Фильм" title="Шаблон:Фильм">Шаблон:Фильм</a></li>
    <li><a title="Без ссылки">Без ссылки</a></li>
    <li><a href="/wiki/Обсуждение:X" title="Обсуждение:X">Обсуждение:X</a></li>
  </ul>
</div>
</body></html>
"#;

    #[test]
    fn test_movie_links() {
        let page = parse_category_page(PAGE_URL, LISTING_HTML);
        let titles: Vec<&str> = page.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Солярис (фильм, 1972)", "Кин-дза-дза!"]);
        assert!(page.movies[0].url.starts_with("https://ru.wikipedia.org/wiki/"));
    }

    #[test]
    fn test_next_page() {
        let page = parse_category_page(PAGE_URL, LISTING_HTML);
        let next = page.next_page.expect("next page link");
        assert!(next.starts_with("https://ru.wikipedia.org/w/index.php?title="));
        assert!(next.contains("pagefrom="));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let html = r#"<div id="mw-pages"><ul><li><a href="/wiki/Ясь_и_Янина" title="Ясь и Янина">Ясь и Янина</a></li></ul></div>"#;
        let page = parse_category_page(PAGE_URL, html);
        assert_eq!(page.movies.len(), 1);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_is_movie_link() {
        assert!(is_movie_link("/wiki/Ко", "Ко", "Кино"));
        assert!(!is_movie_link("/wiki/Ко", "Ко", "Ко"));
        assert!(!is_movie_link("/wiki/Служебная:Поиск", "Поиск", "Поиск по сайту"));
        assert!(!is_movie_link("/wiki/X", "X", ""));
    }
}
