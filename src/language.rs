//! Supported book languages and their localized labels.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A language a book can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Chinese,
    Japanese,
    Russian,
    Portuguese,
    Italian,
    Arabic,
    MedievalLatin,
    KoineGreek,
}

/// Fixed labels used when rendering a book in one language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub chapter_pattern: &'static str,
    pub introduction: &'static str,
    pub conclusion: &'static str,
    pub section_pattern: &'static str,
    pub contents: &'static str,
    pub author_info: &'static str,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Chinese,
        Language::Japanese,
        Language::Russian,
        Language::Portuguese,
        Language::Italian,
        Language::Arabic,
        Language::MedievalLatin,
        Language::KoineGreek,
    ];

    /// Lower-case English name, as used in prompts and by
    /// [`format_title`](crate::text::format_title).
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Chinese => "chinese",
            Language::Japanese => "japanese",
            Language::Russian => "russian",
            Language::Portuguese => "portuguese",
            Language::Italian => "italian",
            Language::Arabic => "arabic",
            Language::MedievalLatin => "medieval latin",
            Language::KoineGreek => "koine greek",
        }
    }

    /// BCP 47 tag for document metadata.
    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Russian => "ru",
            Language::Portuguese => "pt",
            Language::Italian => "it",
            Language::Arabic => "ar",
            Language::MedievalLatin => "la",
            Language::KoineGreek => "grc",
        }
    }

    /// Whether text runs right to left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Arabic)
    }

    pub fn labels(self) -> Labels {
        match self {
            Language::English => Labels {
                chapter_pattern: "Chapter {n}",
                introduction: "Introduction",
                conclusion: "Conclusion",
                section_pattern: "Section {n}",
                contents: "Contents",
                author_info: "Author Information",
            },
            Language::Spanish => Labels {
                chapter_pattern: "Capítulo {n}",
                introduction: "Introducción",
                conclusion: "Conclusiones",
                section_pattern: "Sección {n}",
                contents: "Índice",
                author_info: "Sobre el autor",
            },
            Language::French => Labels {
                chapter_pattern: "Chapitre {n}",
                introduction: "Introduction",
                conclusion: "Conclusion",
                section_pattern: "Section {n}",
                contents: "Table des matières",
                author_info: "À propos de l'auteur",
            },
            Language::German => Labels {
                chapter_pattern: "Kapitel {n}",
                introduction: "Einleitung",
                conclusion: "Fazit",
                section_pattern: "Abschnitt {n}",
                contents: "Inhalt",
                author_info: "Über den Autor",
            },
            Language::Chinese => Labels {
                chapter_pattern: "第{n}章",
                introduction: "引言",
                conclusion: "结论",
                section_pattern: "第{n}节",
                contents: "目录",
                author_info: "关于作者",
            },
            Language::Japanese => Labels {
                chapter_pattern: "第{n}章",
                introduction: "はじめに",
                conclusion: "おわりに",
                section_pattern: "第{n}節",
                contents: "目次",
                author_info: "著者について",
            },
            Language::Russian => Labels {
                chapter_pattern: "Глава {n}",
                introduction: "Введение",
                conclusion: "Заключение",
                section_pattern: "Раздел {n}",
                contents: "Содержание",
                author_info: "Об авторе",
            },
            Language::Portuguese => Labels {
                chapter_pattern: "Capítulo {n}",
                introduction: "Introdução",
                conclusion: "Conclusão",
                section_pattern: "Seção {n}",
                contents: "Sumário",
                author_info: "Sobre o autor",
            },
            Language::Italian => Labels {
                chapter_pattern: "Capitolo {n}",
                introduction: "Introduzione",
                conclusion: "Conclusione",
                section_pattern: "Sezione {n}",
                contents: "Indice",
                author_info: "L'autore",
            },
            Language::Arabic => Labels {
                chapter_pattern: "الفصل {n}",
                introduction: "مقدمة",
                conclusion: "خاتمة",
                section_pattern: "القسم {n}",
                contents: "المحتويات",
                author_info: "عن المؤلف",
            },
            Language::MedievalLatin => Labels {
                chapter_pattern: "Caput {n}",
                introduction: "Prooemium",
                conclusion: "Conclusio",
                section_pattern: "Sectio {n}",
                contents: "Index",
                author_info: "De auctore",
            },
            Language::KoineGreek => Labels {
                chapter_pattern: "Κεφάλαιον {n}",
                introduction: "Προοίμιον",
                conclusion: "Ἐπίλογος",
                section_pattern: "Τμῆμα {n}",
                contents: "Πίναξ",
                author_info: "Περὶ τοῦ συγγραφέως",
            },
        }
    }
}

impl Labels {
    /// Chapter label with its number filled in.
    pub fn chapter(&self, n: u32) -> String {
        self.chapter_pattern.replace("{n}", &n.to_string())
    }

    /// Sub-section label with its number filled in.
    pub fn section(&self, n: usize) -> String {
        self.section_pattern.replace("{n}", &n.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts the English name (any case, `-`/`_` for spaces) or the tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted || lang.tag() == wanted)
            .ok_or_else(|| Error::Validation(format!("unsupported language: {s}")))
    }
}
