//! Product catalog: built-in product master and user-added entries.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CatalogError;
use crate::models::config::CatalogConfig;

/// One sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductCatalogEntry {
    /// Product code (unique within a catalog).
    pub code: String,

    /// Product name as printed in the product master.
    pub name: String,

    /// Tax-exclusive unit price (JPY).
    pub price: u32,

    /// Category tag used by the reporting side (e.g. "QS", "L", "P").
    pub category: String,
}

impl ProductCatalogEntry {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

/// Sections of the built-in product master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogSection {
    Skincare,
    BaseMakeup,
    HairBodyCare,
    Healthcare,
    PointMakeup,
}

impl CatalogSection {
    pub const ALL: [CatalogSection; 5] = [
        CatalogSection::Skincare,
        CatalogSection::BaseMakeup,
        CatalogSection::HairBodyCare,
        CatalogSection::Healthcare,
        CatalogSection::PointMakeup,
    ];

    /// Storage key of the section.
    pub fn key(&self) -> &'static str {
        match self {
            CatalogSection::Skincare => "skincare",
            CatalogSection::BaseMakeup => "baseMakeup",
            CatalogSection::HairBodyCare => "hairBodyCare",
            CatalogSection::Healthcare => "healthcare",
            CatalogSection::PointMakeup => "pointMakeup",
        }
    }

    /// Display name of the section.
    pub fn display_name(&self) -> &'static str {
        match self {
            CatalogSection::Skincare => "スキンケア",
            CatalogSection::BaseMakeup => "ベースメイクアップ",
            CatalogSection::HairBodyCare => "ヘアケア&ボディケア",
            CatalogSection::Healthcare => "ヘルスケア",
            CatalogSection::PointMakeup => "ポイントメイクアップ",
        }
    }

    /// Consumption tax rate in percent. Healthcare products use the reduced rate.
    pub fn tax_rate(&self) -> u32 {
        match self {
            CatalogSection::Healthcare => 8,
            _ => 10,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    fn products(&self) -> &'static [(&'static str, &'static str, u32, &'static str)] {
        match self {
            CatalogSection::Skincare => SKINCARE,
            CatalogSection::BaseMakeup => BASE_MAKEUP,
            CatalogSection::HairBodyCare => HAIR_BODY_CARE,
            CatalogSection::Healthcare => HEALTHCARE,
            CatalogSection::PointMakeup => POINT_MAKEUP,
        }
    }
}

/// Display label of a category tag.
pub fn category_label(tag: &str) -> &str {
    match tag {
        "QS" => "クイーンシルバー",
        "L" => "ローション",
        "P" => "パック",
        "ES" => "エッセンス",
        "SP" => "SPプレペア",
        "MO" => "メイクオフ",
        "酵素" => "酵素",
        "色" => "色",
        "other" => "その他",
        _ => tag,
    }
}

/// Ordered product list, unique by code.
///
/// Serializes as a plain array; deserializing goes through [`Catalog::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<ProductCatalogEntry>",
    into = "Vec<ProductCatalogEntry>"
)]
pub struct Catalog {
    entries: Vec<ProductCatalogEntry>,
}

impl TryFrom<Vec<ProductCatalogEntry>> for Catalog {
    type Error = CatalogError;

    fn try_from(entries: Vec<ProductCatalogEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Catalog> for Vec<ProductCatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries
    }
}

/// User-added products as stored by the ledger app: either a flat list or
/// lists keyed by section.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CustomProducts {
    List(Vec<ProductCatalogEntry>),
    Sections(std::collections::BTreeMap<String, Vec<ProductCatalogEntry>>),
}

impl Catalog {
    /// Build a catalog, rejecting blank fields and duplicate codes.
    pub fn new(entries: Vec<ProductCatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            validate_entry(entry)?;
            if !seen.insert(entry.code.as_str()) {
                return Err(CatalogError::DuplicateCode(entry.code.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in product master.
    pub fn builtin() -> Self {
        let entries = CatalogSection::ALL
            .iter()
            .flat_map(|section| section.products().iter())
            .map(|&(code, name, price, category)| {
                ProductCatalogEntry::new(code, name, price, category)
            })
            .collect();
        Self { entries }
    }

    /// Built-in products followed by `custom` entries.
    pub fn merged(custom: Vec<ProductCatalogEntry>) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        catalog.extend(custom)?;
        Ok(catalog)
    }

    /// Append entries, rejecting codes that are already present.
    pub fn extend(&mut self, entries: Vec<ProductCatalogEntry>) -> Result<(), CatalogError> {
        for entry in entries {
            validate_entry(&entry)?;
            if self.find_by_code(&entry.code).is_some() {
                return Err(CatalogError::DuplicateCode(entry.code));
            }
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Assemble the catalog described by a config: built-in products unless
    /// disabled, then the custom products file.
    ///
    /// `custom_override` replaces the file named in the config.
    pub fn from_config(config: &CatalogConfig, custom_override: Option<&Path>) -> crate::Result<Self> {
        let mut catalog = if config.include_builtin {
            Self::builtin()
        } else {
            Self::default()
        };

        if let Some(path) = custom_override.or(config.custom_products.as_deref()) {
            let custom = Self::custom_from_file(path)?;
            debug!("Loaded {} custom products from {}", custom.len(), path.display());
            catalog.extend(custom)?;
        }

        Ok(catalog)
    }

    /// Parse user-added products from JSON (flat list or keyed by section).
    pub fn custom_from_json(json: &str) -> Result<Vec<ProductCatalogEntry>, CatalogError> {
        let parsed: CustomProducts =
            serde_json::from_str(json).map_err(|e| CatalogError::Load(e.to_string()))?;

        Ok(match parsed {
            CustomProducts::List(entries) => entries,
            CustomProducts::Sections(sections) => {
                // Keep section order of the built-in master, unknown keys last.
                let mut ordered = Vec::new();
                for section in CatalogSection::ALL {
                    if let Some(entries) = sections.get(section.key()) {
                        ordered.extend(entries.iter().cloned());
                    }
                }
                for (key, entries) in &sections {
                    if CatalogSection::from_key(key).is_none() {
                        ordered.extend(entries.iter().cloned());
                    }
                }
                ordered
            }
        })
    }

    /// Load user-added products from a JSON file.
    pub fn custom_from_file(path: &Path) -> Result<Vec<ProductCatalogEntry>, CatalogError> {
        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(format!("{}: {}", path.display(), e)))?;
        Self::custom_from_json(&content)
    }

    pub fn entries(&self) -> &[ProductCatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductCatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&ProductCatalogEntry> {
        self.entries.iter().find(|p| p.code == code)
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ProductCatalogEntry> {
        self.entries.iter().filter(move |p| p.category == category)
    }

    pub fn by_price(&self, price: u32) -> impl Iterator<Item = &ProductCatalogEntry> {
        self.entries.iter().filter(move |p| p.price == price)
    }

    /// Section of a built-in product.
    pub fn builtin_section(code: &str) -> Option<CatalogSection> {
        CatalogSection::ALL
            .into_iter()
            .find(|s| s.products().iter().any(|&(c, _, _, _)| c == code))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ProductCatalogEntry;
    type IntoIter = std::slice::Iter<'a, ProductCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn validate_entry(entry: &ProductCatalogEntry) -> Result<(), CatalogError> {
    if entry.code.trim().is_empty() {
        return Err(CatalogError::InvalidEntry(format!("blank code for {:?}", entry.name)));
    }
    if entry.name.trim().is_empty() {
        return Err(CatalogError::InvalidEntry(format!("blank name for code {}", entry.code)));
    }
    Ok(())
}

// Built-in product master: (code, name, price, category).

const SKINCARE: &[(&str, &str, u32, &str)] = &[
    ("421628", "アルソアクイーンシルバー(135g)", 4000, "QS"),
    ("421636", "アルソアクイーンシルバー(70g)", 2200, "QS"),
    ("421644", "アルソアクイーンシルバーPF(70g)", 2200, "QS"),
    ("421652", "アルソア クレイパック", 3500, "P"),
    ("421660", "アルソア ローションI", 3500, "L"),
    ("421678", "アルソア ローションII", 3500, "L"),
    ("421686", "アルソア セルローション", 4800, "L"),
    ("430265", "アルソア エッセンスI", 5000, "ES"),
    ("421701", "アルソア エッセンスII", 8000, "ES"),
    ("430273", "アルソア セルエッセンス", 13000, "ES"),
    ("421727", "アルソア モイストベイス", 4500, "other"),
    ("430281", "アルソア セルセラム", 8000, "other"),
    ("446775", "アルソア エス", 5000, "other"),
    ("421751", "アルソア セルジェル", 7000, "other"),
    ("421769", "アルソア エッセンスマスク", 7500, "other"),
    ("421777", "アルソア モイスチュアージェル", 3800, "other"),
    ("419540", "アムニーAP ソープ", 3500, "other"),
    ("429789", "アムニーAP スキンソープ", 2000, "other"),
    ("386898", "アムニーAP スキンローション", 2700, "other"),
    ("386905", "アムニーAP スキンコート", 2500, "other"),
];

const BASE_MAKEUP: &[(&str, &str, u32, &str)] = &[
    ("441501", "リベストナチュラルプレペア", 4000, "other"),
    ("441519", "リベストSPプレペア", 4200, "SP"),
    ("441527", "リベストモイストプレペア", 4500, "other"),
    ("441535", "リベストリキッドF ナチュラルピンク(01)", 4000, "other"),
    ("441543", "リベストリキッドF ナチュラルライト(02)", 4000, "other"),
    ("441551", "リベストリキッドF ナチュラル(03)", 4000, "other"),
    ("441569", "リベストリキッドF オークルライト(04)", 4000, "other"),
    ("441577", "リベストリキッドF ナチュラダーク(05)", 4000, "other"),
    ("441585", "リベストリキッドF ヴェールピンクライト(11)", 6000, "other"),
    ("441593", "リベストリキッドF ヴェールナチュラル(12)", 6000, "other"),
    ("441600", "リベストリキッドF ヴェールオークルライト(13)", 6000, "other"),
    ("448490", "リベストリキッドF ヴェールナチュラダーク(14)", 6000, "other"),
    ("441618", "リベストシルキーパウダーF ピンク(21)", 5600, "other"),
    ("441626", "リベストシルキーパウダーF ナチュラルライト(22)", 5600, "other"),
];

const HAIR_BODY_CARE: &[(&str, &str, u32, &str)] = &[
    ("429151", "アルソア シャンプー", 2500, "other"),
    ("437250", "アルソア シャンプー リフィル", 2000, "other"),
    ("429177", "アルソア コンディショナー", 2500, "other"),
    ("437260", "アルソア コンディショナー リフィル", 2000, "other"),
    ("429193", "アルソア EXシャンプー", 2600, "other"),
    ("437270", "アルソア EXシャンプー リフィル", 2200, "other"),
    ("429218", "アルソア EXトリートメント", 2800, "other"),
    ("429226", "アルソア ヘアミスト", 1800, "other"),
    ("429234", "アルソア トリートメントオイル", 2800, "other"),
    ("429242", "アルソア スカルプローション", 2700, "other"),
    ("429250", "アルソア スカルプエッセンス", 4500, "other"),
    ("378952", "プリシーノバスパウダー", 3000, "other"),
    ("381997", "プリシーノボディソープ", 2500, "other"),
    ("382002", "プリシーノボディソープ リフィル", 1700, "other"),
    ("421339", "プリシーノボディミスト", 2000, "other"),
    ("22814", "アピブラシ", 3000, "other"),
    ("445933", "しらきぬの湯s", 3000, "other"),
];

const HEALTHCARE: &[(&str, &str, u32, &str)] = &[
    ("447731", "アルソア 酵素", 10000, "酵素"),
    ("447757", "アルソア 酵素プラス レギュラー", 5500, "酵素"),
    ("447765", "アルソア 酵素プラス ラージ", 15000, "酵素"),
    ("447781", "アルソア 酵素G", 20000, "酵素"),
    ("447806", "アルソア 白鶴霊芝エクストラ 10本入", 12000, "other"),
    ("447814", "アルソア 白鶴霊芝エクストラ 30本入", 32000, "other"),
    ("447856", "アルソア 霊芝 レギュラー", 12000, "other"),
    ("447864", "アルソア 霊芝 ラージ", 30000, "other"),
    ("448028", "アルソア オメガ3", 9000, "other"),
    ("447963", "アルソア シナヤカ レギュラー", 9000, "other"),
    ("447971", "アルソア シナヤカ ラージ", 24000, "other"),
    ("447898", "アルソア ビエッセS", 10000, "other"),
    ("447913", "アルソア ビエッセEX", 20000, "other"),
    ("448010", "アルソア Fe", 4000, "other"),
    ("448044", "アルソア クリアー", 3800, "other"),
    ("447830", "アルソア 白鶴霊芝AG", 12000, "other"),
    ("447997", "アルソア ミネラルプラス", 5800, "other"),
    ("447947", "アルソア セルエナジィV", 10000, "other"),
    ("447939", "アルソア リナカンC", 5000, "other"),
    ("447880", "アルソア ピュアカルCa", 6500, "other"),
    ("448052", "アルソア 白鶴霊芝ティー", 3800, "other"),
];

const POINT_MAKEUP: &[(&str, &str, u32, &str)] = &[
    ("441816", "リベストシェードオンリフィル マザーシェル(C201)", 1400, "色"),
    ("441824", "リベストシェードオンリフィル シルバームーン(C202)", 1400, "色"),
    ("441832", "リベストシェードオンリフィル カームブラック(C203)", 1400, "色"),
    ("441840", "リベストシェードオンリフィル ダイヤモンドダスト(N204)", 1400, "色"),
    ("441858", "リベストシェードオンリフィル トワイライトベージュ(N205)", 1400, "色"),
    ("441866", "リベストシェードオンリフィル ジャスパーレッド(N206)", 1400, "色"),
    ("441874", "リベストシェードオンリフィル サンライト(W207)", 1400, "色"),
    ("441882", "リベストシェードオンリフィル オレンジミスト(W208)", 1400, "色"),
    ("441890", "リベストシェードオンリフィル ピノブラウン(W209)", 1400, "色"),
    ("441907", "リベストシェードオンリフィル オーロラブルー(C210)", 1400, "色"),
    ("441915", "リベストシェードオンリフィル オーシャンレイ(C211)", 1400, "色"),
    ("441923", "リベストシェードオンリフィル コモレビイエロー(N212)", 1400, "色"),
    ("441931", "リベストシェードオンリフィル ローズクラウド(N213)", 1400, "色"),
    ("441949", "リベストシェードオンリフィル デューンゴールド(W214)", 1400, "色"),
    ("441957", "リベストシェードオンリフィル サバンナグリーン(W215)", 1400, "色"),
    ("441965", "リベストブラッシュオンリフィル ハピネスピンク(C401)", 1800, "色"),
    ("441973", "リベストブラッシュオンリフィル ディライトコーラル(N402)", 1800, "色"),
    ("441981", "リベストブラッシュオンリフィル チアフルオレンジ(W403)", 1800, "色"),
    ("441999", "リベストブラッシュオンリフィル グレースローズ(C404)", 1800, "色"),
    ("442004", "リベストブラッシュオンリフィル シフォンホワイト(N405)", 1800, "色"),
    ("442012", "リベストブラッシュオンリフィル セピアベージュ(N406)", 1800, "色"),
    ("442020", "リベストリップカラーリフィル ビーナスピンク(C701)", 1000, "色"),
    ("442038", "リベストリップカラーリフィル パレスピンク(C702)", 1000, "色"),
    ("442046", "リベストリップカラーリフィル セーブルローズ(C703)", 1000, "色"),
    ("442054", "リベストリップカラーリフィル グアバピンク(N704)", 1000, "色"),
    ("442062", "リベストリップカラーリフィル オペラレッド(N705)", 1000, "色"),
    ("442070", "リベストリップカラーリフィル レッドリリー(N706)", 1000, "色"),
    ("442088", "リベストリップカラーリフィル オレンジゼラニウム(W707)", 1000, "色"),
    ("442096", "リベストリップカラーリフィル ピーチヴェール(W708)", 1000, "色"),
    ("442103", "リベストリップカラーリフィル ガナッシュブラウン(W709)", 1000, "色"),
    ("442111", "リベストリップカラーリフィル マジックティント(80)", 1000, "色"),
    ("446098", "リベストリップコート", 3000, "other"),
    ("446080", "リベストリップグロス シャイニークリア", 2300, "other"),
    ("446006", "リベストアイブロウホルダー", 1700, "other"),
    ("445983", "リベストアイブロウリフィル ブラウン(55)", 1700, "other"),
    ("445991", "リベストアイブロウリフィル グレー(56)", 1700, "other"),
    ("446048", "リベストアイブロウパウダー", 3800, "other"),
    ("446056", "リベストアイブロウパウダー リフィル", 2700, "other"),
    ("446030", "リベストアイライナーホルダー", 1700, "other"),
    ("446014", "リベストアイライナーリフィル ブラウン(50)", 1700, "other"),
    ("446022", "リベストアイライナーリフィル グレー(51)", 1700, "other"),
    ("446064", "リベストリキッドアイライナー ブラック", 2100, "other"),
    ("446072", "リベストナチュラルロングマスカラ ブラック", 3300, "other"),
    ("420670", "眉ブラシ＆コーム", 500, "other"),
    ("448622", "リップブラシ", 1500, "other"),
    ("441759", "リベストメイクオフ", 3000, "MO"),
];
