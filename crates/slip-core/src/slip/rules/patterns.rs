//! Common regex patterns for sales slip extraction.
//!
//! Price, quantity and date patterns expect input that went through
//! [`fold_width`](super::similarity::fold_width), so they only list ASCII
//! digits and separators.

use lazy_static::lazy_static;
use regex::Regex;

/// Characters a Japanese personal name is written in.
const NAME_CHAR: &str = r"[\p{Han}\p{Hiragana}\p{Katakana}々〆ー]";

/// Honorific suffixes following a customer name.
const HONORIFIC: &str = r"(?:様|さま|殿)";

lazy_static! {
    // Lines that never carry a product
    pub static ref EXCLUDE_TAX_SUMMARY: Regex = Regex::new(
        r"消費税|税込|税抜|内税|外税|税率|小計|合計|総計|総額|お預り|お釣り|値引"
    ).unwrap();

    pub static ref EXCLUDE_BANK_INFO: Regex = Regex::new(
        r"銀行|信用金庫|信金|振込|振り込み|口座|普通預金|当座|支店|名義|ゆうちょ"
    ).unwrap();

    pub static ref EXCLUDE_GREETING: Regex = Regex::new(
        r"ありがとう|有難う|お世話|よろしく|宜しく|いつも|またのご来店|ご利用"
    ).unwrap();

    pub static ref EXCLUDE_DOCUMENT: Regex = Regex::new(
        r"(?i)請求書|納品書|領収書|売上伝票|伝票番号|御中|住所|電話|〒|発行日|担当|TEL|FAX"
    ).unwrap();

    pub static ref EXCLUDE_TABLE_HEADER: Regex = Regex::new(
        r"^[\s|/・]*(?:(?:品名|商品名|品番|商品コード|数量|単価|金額|価格|備考|摘要|No\.?)[\s|/・]*)+$"
    ).unwrap();

    pub static ref BARE_NUMBER: Regex = Regex::new(
        r"^[\d,，\s]+$"
    ).unwrap();

    // Customer name: surname + given name + honorific, whitespace kept between tokens
    pub static ref NAME_TWO_TOKEN: Regex = Regex::new(&format!(
        r"({c}{{1,6}}[ \t\x{{3000}}]*{c}{{1,6}})[ \t\x{{3000}}]*{h}",
        c = NAME_CHAR,
        h = HONORIFIC
    )).unwrap();

    pub static ref NAME_SINGLE_TOKEN: Regex = Regex::new(&format!(
        r"({c}{{2,8}}){h}",
        c = NAME_CHAR,
        h = HONORIFIC
    )).unwrap();

    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?:顧客|お客様|お名前|氏名)\s*[:：]\s*(.+)"
    ).unwrap();

    pub static ref HONORIFIC_SUFFIX: Regex = Regex::new(&format!(
        r"[\s\x{{3000}}]*{h}$",
        h = HONORIFIC
    )).unwrap();

    // Dates, in priority order
    pub static ref DATE_ERA_ABBREVIATED: Regex = Regex::new(
        r"[RrＲ]\s*([0-9]{1,2})\s*年\s*([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*日"
    ).unwrap();

    pub static ref DATE_ERA_FULL: Regex = Regex::new(
        r"令和\s*([0-9]{1,2}|元)\s*年\s*([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*日"
    ).unwrap();

    pub static ref DATE_ERA_NUMERIC: Regex = Regex::new(
        r"[RrＲ]\s*([0-9]{1,2})\s*[./]\s*([0-9]{1,2})\s*[./]\s*([0-9]{1,2})"
    ).unwrap();

    pub static ref DATE_WESTERN: Regex = Regex::new(
        r"([0-9]{4})\s*[/\-.年]\s*([0-9]{1,2})\s*[/\-.月]\s*([0-9]{1,2})\s*日?"
    ).unwrap();

    pub static ref DATE_MONTH_DAY: Regex = Regex::new(
        r"([0-9]{1,2})\s*月\s*([0-9]{1,2})\s*日"
    ).unwrap();

    // Prices, in priority order
    pub static ref PRICE_WITH_CURRENCY: Regex = Regex::new(
        r"¥\s*([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)"
    ).unwrap();

    pub static ref PRICE_WITH_YEN: Regex = Regex::new(
        r"(?:^|[^0-9,])([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)\s*円"
    ).unwrap();

    pub static ref PRICE_GROUPED: Regex = Regex::new(
        r"(?:^|[^0-9,])([0-9]{1,3}(?:,[0-9]{3})+)(?:[^0-9]|$)"
    ).unwrap();

    // Six-digit runs are product codes, not prices
    pub static ref PRICE_BARE: Regex = Regex::new(
        r"(?:^|[^0-9,])([0-9]{3,5})(?:[^0-9,]|$)"
    ).unwrap();

    // Quantities, in priority order
    // A Latin x only counts when it is not the tail of a word like "EX"
    pub static ref QUANTITY_MULTIPLIER: Regex = Regex::new(
        r"(?:×\s*|(?:^|[^A-Za-z])[xX])([0-9]{1,3})"
    ).unwrap();

    pub static ref QUANTITY_COUNTER: Regex = Regex::new(
        r"([0-9]{1,3})\s*(?:個|本|点|セット|set|SET|箱|袋)"
    ).unwrap();

    // Pack sizes that are part of a product name: "10本入", "30本入り"
    pub static ref PACK_SIZE: Regex = Regex::new(
        r"[0-9]+\s*本入り?"
    ).unwrap();

    pub static ref QUANTITY_LABELED: Regex = Regex::new(
        r"数量\s*:?\s*([0-9]{1,3})"
    ).unwrap();

    pub static ref QUANTITY_DELIMITED: Regex = Regex::new(
        r"[|/]\s*([0-9]{1,2})\s*(?:[|/]|$)"
    ).unwrap();

    // Parenthesized segments of product names: "(135g)", "（C201）"
    pub static ref PARENTHESIZED: Regex = Regex::new(
        r"[（(][^）)]*[）)]"
    ).unwrap();

    pub static ref BRAND_TOKENS: Regex = Regex::new(
        r"(?i)アルソア|ARSOA"
    ).unwrap();
}
