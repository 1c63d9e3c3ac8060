//! Built-in data served when the upstream API cannot be reached.

use crate::config::{DEFAULT_RECITER, DEFAULT_TRANSLATION};
use crate::models::{Reciter, Translation, Verse};

/// Al-Fatihah 1:1, with the default translation attached
pub fn verse() -> Verse {
    Verse {
        id: 1,
        verse_number: 1,
        verse_key: "1:1".to_string(),
        text_uthmani: "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ".to_string(),
        text_imlaei_simple: Some("بسم الله الرحمن الرحيم".to_string()),
        juz_number: Some(1),
        hizb_number: Some(1),
        rub_el_hizb_number: Some(1),
        page_number: Some(1),
        translations: vec![Translation {
            id: None,
            resource_id: DEFAULT_TRANSLATION,
            resource_name: Some("Dr. Mustafa Khattab, The Clear Quran".to_string()),
            language_name: Some("english".to_string()),
            text: "In the Name of Allah—the Most Compassionate, Most Merciful.".to_string(),
        }],
        audio: None,
    }
}

/// Mishari Rashid al-`Afasy
pub fn reciter() -> Reciter {
    Reciter {
        id: DEFAULT_RECITER,
        reciter_name: "Mishari Rashid al-`Afasy".to_string(),
        name_arabic: Some("مشاري راشد العفاسي".to_string()),
        style: Some("Murattal".to_string()),
        relative_path: Some("mishari_al_afasy/murattal/".to_string()),
        format: Some("mp3".to_string()),
        files_size: None,
    }
}
