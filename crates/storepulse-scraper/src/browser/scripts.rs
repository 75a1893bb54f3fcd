//! In-page scripts run through `execute/sync`.
//!
//! Each returns a JSON-friendly value: a boolean for "did it act", or a count
//! for the scroll helpers (`-1` when the container is missing).

/// Hide the `navigator.webdriver` automation flag.
pub const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined }); return true;";

/// Click the consent dialog's accept-all button if present.
pub const ACCEPT_COOKIES: &str = r"
const wanted = ['tout accepter', 'accept all'];
for (const btn of document.querySelectorAll('button')) {
  const label = (btn.innerText || '').trim().toLowerCase();
  if (wanted.some((w) => label.includes(w))) { btn.click(); return true; }
}
return false;
";

/// Scroll the first container matching one of `arguments[0]` to its bottom,
/// then count elements matching `arguments[1]`.
pub const SCROLL_AND_COUNT: &str = r"
const selectors = arguments[0];
let box = null;
for (const sel of selectors) { box = document.querySelector(sel); if (box) break; }
if (!box) return -1;
box.scrollTop = box.scrollHeight;
return document.querySelectorAll(arguments[1]).length;
";

/// Count elements matching `arguments[0]`.
pub const COUNT: &str = "return document.querySelectorAll(arguments[0]).length;";

/// Open the reviews tab: a `button[role=tab]` labelled avis/review.
pub const OPEN_REVIEWS_TAB: &str = r"
for (const tab of document.querySelectorAll('button[role=tab]')) {
  const label = (tab.getAttribute('aria-label') || tab.innerText || '').toLowerCase();
  if (label.includes('avis') || label.includes('review')) { tab.click(); return true; }
}
return false;
";

/// Fallback: click a button whose text reads like `128 avis` / `128 reviews`.
pub const OPEN_REVIEW_COUNT: &str = r"
const pattern = /\d[\d\s .,]*\s*(avis|reviews?)/i;
for (const btn of document.querySelectorAll('button')) {
  if (pattern.test(btn.innerText || '')) { btn.click(); return true; }
}
return false;
";

/// Open the sort menu (its label contains "Trier" / "Sort").
pub const OPEN_SORT_MENU: &str = r"
const btn = document.querySelector('button[aria-label*=rier], button[aria-label*=Sort]');
if (!btn) return false;
btn.click();
return true;
";

/// Pick the newest-first entry of an open sort menu.
pub const PICK_NEWEST: &str = r"
for (const item of document.querySelectorAll('div[role=menuitemradio]')) {
  const label = (item.innerText || '').toLowerCase();
  if (label.includes('recent') || label.includes('récent') || label.includes('nouveau') || label.includes('newest')) {
    item.click();
    return true;
  }
}
return false;
";

/// Expand every truncated review body. Returns how many were clicked.
pub const EXPAND_MORE: &str = r"
let clicked = 0;
for (const btn of document.querySelectorAll('button.w8nwRe.kyuRq')) {
  try { btn.click(); clicked += 1; } catch (e) {}
}
return clicked;
";

/// Result-list container on a search page.
pub const FEED_CONTAINERS: &[&str] = &["div[role=feed]"];

/// Scrollable review pane, most specific first.
pub const REVIEW_CONTAINERS: &[&str] = &[
    "div.m6QErb.DxyBCb.kA9KIf.dS8AEf",
    "div.m6QErb.DxyBCb",
    "div.m6QErb",
];

pub const STORE_LINK: &str = "a.hfpxzc";

pub const REVIEW_BLOCK: &str = "div.jftiEf";

/// Ways of reaching the review list, tried in order until one acts.
pub const OPEN_REVIEWS_STRATEGIES: &[(&str, &str)] = &[
    ("reviews-tab", OPEN_REVIEWS_TAB),
    ("review-count-button", OPEN_REVIEW_COUNT),
];
