//! Fixed checklist catalogs. These are configuration, not user data: the set
//! of variants and steps never changes at runtime, and the persisted records
//! are normalized against them on every load. Keys come verbatim from the
//! production pipeline and must stay stable because they double as JSON map
//! keys in the store.

/// A single catalog entry: the stable storage key and the label shown in the
/// UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub key: &'static str,
    pub label: &'static str,
}

const fn step(key: &'static str, label: &'static str) -> Step {
    Step { key, label }
}

/// The 10 output-format variants tracked per artist. Order matters: the UI
/// renders columns in this order and normalization iterates it.
pub const VARIANTS: [Step; 10] = [
    step("dikey", "Dikey"),
    step("yatay", "Yatay"),
    step("kare", "Kare"),
    step("ince_dikey", "İnce dikey"),
    step("ince_yatay", "İnce yatay"),
    step("eksik_dikey", "Eksik dikey"),
    step("eksik_yatay", "Eksik yatay"),
    step("eksik_kare", "Eksik kare"),
    step("eksik_ince_dikey", "Eksik ince dikey"),
    step("eksik_ince_yatay", "Eksik ince yatay"),
];

/// The 6 steps repeated inside every variant column.
pub const COLUMN_STEPS: [Step; 6] = [
    step("eserlerin_editlendi", "Eserlerin editlendi"),
    step("kalite_artirildi", "Kalite - artırıldı"),
    step("urun_aciklamalari_olusturuldu", "Ürün açıklamaları oluşturuldu"),
    step("mockuplar_videolar_olusturuldu", "Mockuplar ve videolar oluşturuldu"),
    step("printify_yuklendi", "Printify'a - yüklendi"),
    step("etsy_yuklendi", "Etsy'e yüklendi"),
];

/// The 3 one-time steps scoped to the artist as a whole.
pub const GLOBAL_STEPS: [Step; 3] = [
    step(
        "research_tamamlandi",
        "Sanatçının satan ve popüler eserlerinin araştırılması",
    ),
    step(
        "eksikler_belirlendi",
        "Kaynaklarımız içerisinde bulunmayan popüler eserlerin tespit edilmesi",
    ),
    step(
        "eksikler_tamamlandi",
        "Eksik olduğu tespit edilen popüler eserlerin temin edilmesi",
    ),
];

/// Total checklist size per artist. The denominator for every completion
/// ratio in the application.
pub const TOTAL_STEPS: usize = GLOBAL_STEPS.len() + VARIANTS.len() * COLUMN_STEPS.len();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_sizes_match_pipeline() {
        assert_eq!(GLOBAL_STEPS.len(), 3);
        assert_eq!(COLUMN_STEPS.len(), 6);
        assert_eq!(VARIANTS.len(), 10);
        assert_eq!(TOTAL_STEPS, 63);
    }

    #[test]
    fn catalog_keys_are_unique() {
        let variant_keys: HashSet<_> = VARIANTS.iter().map(|s| s.key).collect();
        assert_eq!(variant_keys.len(), VARIANTS.len());
        let column_keys: HashSet<_> = COLUMN_STEPS.iter().map(|s| s.key).collect();
        assert_eq!(column_keys.len(), COLUMN_STEPS.len());
        let global_keys: HashSet<_> = GLOBAL_STEPS.iter().map(|s| s.key).collect();
        assert_eq!(global_keys.len(), GLOBAL_STEPS.len());
    }
}
