//! Surah and juz tables of the 604-page Madinah Mushaf.

use std::sync::LazyLock;

use super::{DisplayNames, StructuralUnit, SubDivisionUnit, UnitTable};
use crate::engine::Page;

pub const MUSHAF_TOTAL_PAGES: Page = 604;

/// (number, Arabic name, English name, German name, start page)
const SURAH_ROWS: [(u32, &str, &str, &str, Page); 114] = [
    (1, "الفاتحة", "Al-Fatihah", "Die Eröffnung", 1),
    (2, "البقرة", "Al-Baqarah", "Die Kuh", 2),
    (3, "آل عمران", "Aal-Imran", "Die Sippe Imrans", 50),
    (4, "النساء", "An-Nisa", "Die Frauen", 77),
    (5, "المائدة", "Al-Ma'idah", "Der Tisch", 106),
    (6, "الأنعام", "Al-An'am", "Das Vieh", 128),
    (7, "الأعراف", "Al-A'raf", "Die Höhen", 151),
    (8, "الأنفال", "Al-Anfal", "Die Beute", 177),
    (9, "التوبة", "At-Tawbah", "Die Reue", 187),
    (10, "يونس", "Yunus", "Jonas", 208),
    (11, "هود", "Hud", "Hud", 221),
    (12, "يوسف", "Yusuf", "Josef", 235),
    (13, "الرعد", "Ar-Ra'd", "Der Donner", 249),
    (14, "إبراهيم", "Ibrahim", "Abraham", 255),
    (15, "الحجر", "Al-Hijr", "Das Steinland", 262),
    (16, "النحل", "An-Nahl", "Die Biene", 267),
    (17, "الإسراء", "Al-Isra", "Die Nachtreise", 282),
    (18, "الكهف", "Al-Kahf", "Die Höhle", 293),
    (19, "مريم", "Maryam", "Maria", 305),
    (20, "طه", "Ta-Ha", "Ta-Ha", 312),
    (21, "الأنبياء", "Al-Anbiya", "Die Propheten", 322),
    (22, "الحج", "Al-Hajj", "Die Pilgerfahrt", 332),
    (23, "المؤمنون", "Al-Mu'minun", "Die Gläubigen", 342),
    (24, "النور", "An-Nur", "Das Licht", 350),
    (25, "الفرقان", "Al-Furqan", "Die Unterscheidung", 359),
    (26, "الشعراء", "Ash-Shu'ara", "Die Dichter", 367),
    (27, "النمل", "An-Naml", "Die Ameise", 377),
    (28, "القصص", "Al-Qasas", "Die Geschichten", 385),
    (29, "العنكبوت", "Al-Ankabut", "Die Spinne", 396),
    (30, "الروم", "Ar-Rum", "Die Byzantiner", 404),
    (31, "لقمان", "Luqman", "Luqman", 411),
    (32, "السجدة", "As-Sajdah", "Die Niederwerfung", 415),
    (33, "الأحزاب", "Al-Ahzab", "Die Verbündeten", 418),
    (34, "سبأ", "Saba", "Saba", 428),
    (35, "فاطر", "Fatir", "Der Schöpfer", 434),
    (36, "يس", "Ya-Sin", "Ya-Sin", 440),
    (37, "الصافات", "As-Saffat", "Die Reihen", 446),
    (38, "ص", "Sad", "Sad", 453),
    (39, "الزمر", "Az-Zumar", "Die Scharen", 458),
    (40, "غافر", "Ghafir", "Der Vergebende", 467),
    (41, "فصلت", "Fussilat", "Ausführlich dargelegt", 477),
    (42, "الشورى", "Ash-Shura", "Die Beratung", 483),
    (43, "الزخرف", "Az-Zukhruf", "Der Goldschmuck", 489),
    (44, "الدخان", "Ad-Dukhan", "Der Rauch", 496),
    (45, "الجاثية", "Al-Jathiyah", "Die Kniende", 499),
    (46, "الأحقاف", "Al-Ahqaf", "Die Dünen", 502),
    (47, "محمد", "Muhammad", "Muhammad", 507),
    (48, "الفتح", "Al-Fath", "Der Sieg", 511),
    (49, "الحجرات", "Al-Hujurat", "Die Gemächer", 515),
    (50, "ق", "Qaf", "Qaf", 518),
    (51, "الذاريات", "Adh-Dhariyat", "Die Aufwirbelnden", 520),
    (52, "الطور", "At-Tur", "Der Berg", 523),
    (53, "النجم", "An-Najm", "Der Stern", 526),
    (54, "القمر", "Al-Qamar", "Der Mond", 528),
    (55, "الرحمن", "Ar-Rahman", "Der Barmherzige", 531),
    (56, "الواقعة", "Al-Waqi'ah", "Das Ereignis", 534),
    (57, "الحديد", "Al-Hadid", "Das Eisen", 537),
    (58, "المجادلة", "Al-Mujadilah", "Die Streitende", 542),
    (59, "الحشر", "Al-Hashr", "Die Versammlung", 545),
    (60, "الممتحنة", "Al-Mumtahanah", "Die Geprüfte", 549),
    (61, "الصف", "As-Saff", "Die Reihe", 551),
    (62, "الجمعة", "Al-Jumu'ah", "Der Freitag", 553),
    (63, "المنافقون", "Al-Munafiqun", "Die Heuchler", 554),
    (64, "التغابن", "At-Taghabun", "Die Übervorteilung", 556),
    (65, "الطلاق", "At-Talaq", "Die Scheidung", 558),
    (66, "التحريم", "At-Tahrim", "Das Verbot", 560),
    (67, "الملك", "Al-Mulk", "Die Herrschaft", 562),
    (68, "القلم", "Al-Qalam", "Das Schreibrohr", 564),
    (69, "الحاقة", "Al-Haqqah", "Die Wahrhaftige", 566),
    (70, "المعارج", "Al-Ma'arij", "Die Aufstiegswege", 568),
    (71, "نوح", "Nuh", "Noah", 570),
    (72, "الجن", "Al-Jinn", "Die Dschinn", 572),
    (73, "المزمل", "Al-Muzzammil", "Der Eingehüllte", 574),
    (74, "المدثر", "Al-Muddaththir", "Der Zugedeckte", 575),
    (75, "القيامة", "Al-Qiyamah", "Die Auferstehung", 577),
    (76, "الإنسان", "Al-Insan", "Der Mensch", 578),
    (77, "المرسلات", "Al-Mursalat", "Die Gesandten", 580),
    (78, "النبأ", "An-Naba", "Die Kunde", 582),
    (79, "النازعات", "An-Nazi'at", "Die Entreißenden", 583),
    (80, "عبس", "Abasa", "Er runzelte die Stirn", 585),
    (81, "التكوير", "At-Takwir", "Das Einhüllen", 586),
    (82, "الانفطار", "Al-Infitar", "Das Zerbrechen", 587),
    (83, "المطففين", "Al-Mutaffifin", "Die Betrüger", 587),
    (84, "الانشقاق", "Al-Inshiqaq", "Das Zerreißen", 589),
    (85, "البروج", "Al-Buruj", "Die Türme", 590),
    (86, "الطارق", "At-Tariq", "Der Nachtstern", 591),
    (87, "الأعلى", "Al-A'la", "Der Höchste", 591),
    (88, "الغاشية", "Al-Ghashiyah", "Die Überwältigende", 592),
    (89, "الفجر", "Al-Fajr", "Die Morgendämmerung", 593),
    (90, "البلد", "Al-Balad", "Die Stadt", 594),
    (91, "الشمس", "Ash-Shams", "Die Sonne", 595),
    (92, "الليل", "Al-Layl", "Die Nacht", 595),
    (93, "الضحى", "Ad-Duha", "Der Vormittag", 596),
    (94, "الشرح", "Ash-Sharh", "Das Auftun", 596),
    (95, "التين", "At-Tin", "Die Feige", 597),
    (96, "العلق", "Al-Alaq", "Das Anhängsel", 597),
    (97, "القدر", "Al-Qadr", "Die Bestimmung", 598),
    (98, "البينة", "Al-Bayyinah", "Der Beweis", 598),
    (99, "الزلزلة", "Az-Zalzalah", "Das Erdbeben", 599),
    (100, "العاديات", "Al-Adiyat", "Die Rennenden", 599),
    (101, "القارعة", "Al-Qari'ah", "Das Verhängnis", 600),
    (102, "التكاثر", "At-Takathur", "Die Vermehrung", 600),
    (103, "العصر", "Al-Asr", "Die Zeit", 601),
    (104, "الهمزة", "Al-Humazah", "Der Stichler", 601),
    (105, "الفيل", "Al-Fil", "Der Elefant", 601),
    (106, "قريش", "Quraysh", "Die Quraisch", 602),
    (107, "الماعون", "Al-Ma'un", "Die Hilfeleistung", 602),
    (108, "الكوثر", "Al-Kawthar", "Die Fülle", 602),
    (109, "الكافرون", "Al-Kafirun", "Die Ungläubigen", 603),
    (110, "النصر", "An-Nasr", "Die Hilfe", 603),
    (111, "المسد", "Al-Masad", "Die Palmfasern", 603),
    (112, "الإخلاص", "Al-Ikhlas", "Die Aufrichtigkeit", 604),
    (113, "الفلق", "Al-Falaq", "Das Frühlicht", 604),
    (114, "الناس", "An-Nas", "Die Menschen", 604),
];

const JUZ_START_PAGES: [Page; 30] = [
    1, 22, 42, 62, 82, 102, 121, 142, 162, 182,
    201, 222, 242, 262, 282, 302, 322, 342, 362, 382,
    402, 422, 442, 462, 482, 502, 522, 542, 562, 582,
];

static SURAHS: LazyLock<UnitTable<StructuralUnit>> = LazyLock::new(|| {
    let units = SURAH_ROWS.iter().map(|&(ordinal, ar, en, de, start_page)| StructuralUnit {
        ordinal,
        names: DisplayNames::new(ar).with("en", en).with("de", de),
        start_page,
    });
    UnitTable::from_units(MUSHAF_TOTAL_PAGES, units)
        .unwrap_or_else(|e| panic!("built-in surah table is malformed: {e}"))
});

static JUZS: LazyLock<UnitTable<SubDivisionUnit>> = LazyLock::new(|| {
    let units = JUZ_START_PAGES
        .iter()
        .zip(1..)
        .map(|(&start_page, ordinal)| SubDivisionUnit { ordinal, start_page });
    UnitTable::from_units(MUSHAF_TOTAL_PAGES, units)
        .unwrap_or_else(|e| panic!("built-in juz table is malformed: {e}"))
});

/// All 114 surahs, built on first use
pub fn surahs() -> &'static UnitTable<StructuralUnit> {
    &SURAHS
}

/// All 30 juz, built on first use
pub fn juzs() -> &'static UnitTable<SubDivisionUnit> {
    &JUZS
}
