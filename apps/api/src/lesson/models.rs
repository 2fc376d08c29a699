use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Grades covered by lower and upper secondary school.
pub const GRADES: &[&str] = &["6", "7", "8", "9", "10", "11", "12"];

const DEFAULT_GRADE: &str = "12";
const DEFAULT_TEXTBOOK: &str = "Kết nối tri thức với cuộc sống";
const DEFAULT_DURATION: &str = "1 tiết (45 phút)";

/// School subject. Serialized as the label shown in the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    #[default]
    #[serde(rename = "Toán")]
    Math,
    #[serde(rename = "Ngữ văn")]
    Literature,
    #[serde(rename = "Tiếng Anh")]
    English,
    #[serde(rename = "Vật lí")]
    Physics,
    #[serde(rename = "Hóa học")]
    Chemistry,
    #[serde(rename = "Sinh học")]
    Biology,
    #[serde(rename = "Lịch sử")]
    History,
    #[serde(rename = "Địa lí")]
    Geography,
    #[serde(rename = "Giáo dục kinh tế và pháp luật")]
    EconomicsAndLaw,
    #[serde(rename = "Tin học")]
    Informatics,
    #[serde(rename = "Công nghệ")]
    Technology,
    #[serde(rename = "Khoa học tự nhiên")]
    NaturalScience,
    #[serde(rename = "Lịch sử và Địa lí")]
    HistoryAndGeography,
    #[serde(rename = "Giáo dục công dân")]
    CivicEducation,
    #[serde(rename = "Hoạt động trải nghiệm, hướng nghiệp")]
    ExperientialActivities,
    #[serde(rename = "Giáo dục thể chất")]
    PhysicalEducation,
    #[serde(rename = "Âm nhạc")]
    Music,
    #[serde(rename = "Mĩ thuật")]
    FineArts,
    #[serde(rename = "Giáo dục quốc phòng và an ninh")]
    DefenseEducation,
}

impl Subject {
    pub const ALL: &'static [Subject] = &[
        Subject::Math,
        Subject::Literature,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::History,
        Subject::Geography,
        Subject::EconomicsAndLaw,
        Subject::Informatics,
        Subject::Technology,
        Subject::NaturalScience,
        Subject::HistoryAndGeography,
        Subject::CivicEducation,
        Subject::ExperientialActivities,
        Subject::PhysicalEducation,
        Subject::Music,
        Subject::FineArts,
        Subject::DefenseEducation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Math => "Toán",
            Subject::Literature => "Ngữ văn",
            Subject::English => "Tiếng Anh",
            Subject::Physics => "Vật lí",
            Subject::Chemistry => "Hóa học",
            Subject::Biology => "Sinh học",
            Subject::History => "Lịch sử",
            Subject::Geography => "Địa lí",
            Subject::EconomicsAndLaw => "Giáo dục kinh tế và pháp luật",
            Subject::Informatics => "Tin học",
            Subject::Technology => "Công nghệ",
            Subject::NaturalScience => "Khoa học tự nhiên",
            Subject::HistoryAndGeography => "Lịch sử và Địa lí",
            Subject::CivicEducation => "Giáo dục công dân",
            Subject::ExperientialActivities => "Hoạt động trải nghiệm, hướng nghiệp",
            Subject::PhysicalEducation => "Giáo dục thể chất",
            Subject::Music => "Âm nhạc",
            Subject::FineArts => "Mĩ thuật",
            Subject::DefenseEducation => "Giáo dục quốc phòng và an ninh",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Digital competency framework (Circular 02/2025)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompetencyItem {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompetencyDomain {
    pub domain: &'static str,
    pub items: &'static [CompetencyItem],
}

const fn item(id: &'static str, label: &'static str) -> CompetencyItem {
    CompetencyItem { id, label }
}

/// The fixed 7-domain taxonomy users pick competency codes from.
pub const NLS_FRAMEWORK: &[CompetencyDomain] = &[
    CompetencyDomain {
        domain: "Lĩnh vực 1: Khai thác thiết bị và phần mềm",
        items: &[
            item("1.1", "1.1. Khai thác thiết bị số"),
            item("1.2", "1.2. Khai thác phần mềm ứng dụng"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 2: Thông tin và dữ liệu",
        items: &[
            item("2.1", "2.1. Tìm kiếm và lọc dữ liệu số"),
            item("2.2", "2.2. Đánh giá dữ liệu số"),
            item("2.3", "2.3. Quản lý dữ liệu số"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 3: Truyền thông và cộng tác",
        items: &[
            item("3.1", "3.1. Tương tác trong môi trường số"),
            item("3.2", "3.2. Chia sẻ thông tin số"),
            item("3.3", "3.3. Cộng tác số"),
            item("3.4", "3.4. Ứng xử chuẩn mực số"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 4: Sáng tạo nội dung số",
        items: &[
            item("4.1", "4.1. Phát triển nội dung số"),
            item("4.2", "4.2. Chỉnh sửa nội dung số"),
            item("4.3", "4.3. Bản quyền và giấy phép"),
            item("4.4", "4.4. Lập trình"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 5: An toàn và bảo mật số",
        items: &[
            item("5.1", "5.1. Bảo vệ thiết bị số"),
            item("5.2", "5.2. Bảo vệ dữ liệu cá nhân"),
            item("5.3", "5.3. Bảo vệ sức khoẻ"),
            item("5.4", "5.4. Bảo vệ môi trường"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 6: Giải quyết vấn đề",
        items: &[
            item("6.1", "6.1. Giải quyết vấn đề kỹ thuật"),
            item("6.2", "6.2. Sáng tạo trong dùng công nghệ"),
            item("6.3", "6.3. Tự học phát triển NLS"),
        ],
    },
    CompetencyDomain {
        domain: "Lĩnh vực 7: Định hướng nghề nghiệp",
        items: &[
            item("7.1", "7.1. Tìm hiểu thị trường lao động số"),
            item("7.2", "7.2. Tìm kiếm việc làm trực tuyến"),
        ],
    },
];

pub fn is_known_competency(id: &str) -> bool {
    NLS_FRAMEWORK
        .iter()
        .flat_map(|d| d.items.iter())
        .any(|i| i.id == id)
}

// ────────────────────────────────────────────────────────────────────────────
// Form input
// ────────────────────────────────────────────────────────────────────────────

/// Everything the user fills in on the "create" form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonPlanInput {
    pub subject: Subject,
    pub grade: String,
    pub textbook: String,
    pub duration: String,
    pub lesson_name: String,
    /// Learning outcomes ("yêu cầu cần đạt"). Blank means "derive from the 2018 curriculum".
    pub yccd: String,
    /// Typed content plus any text pulled out of an uploaded reference file.
    pub content: String,
    /// Competency ids from `NLS_FRAMEWORK`. Empty lets the model choose.
    pub selected_nls: Vec<String>,
}

impl Default for LessonPlanInput {
    fn default() -> Self {
        Self {
            subject: Subject::default(),
            grade: DEFAULT_GRADE.to_string(),
            textbook: DEFAULT_TEXTBOOK.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            lesson_name: String::new(),
            yccd: String::new(),
            content: String::new(),
            selected_nls: Vec::new(),
        }
    }
}

impl LessonPlanInput {
    /// Checks the form invariants and returns the input with competency ids
    /// trimmed and de-duplicated (first occurrence wins).
    pub fn validated(mut self) -> Result<Self, AppError> {
        if self.lesson_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Vui lòng nhập tên bài dạy.".to_string(),
            ));
        }

        self.grade = self.grade.trim().to_string();
        if !GRADES.contains(&self.grade.as_str()) {
            return Err(AppError::Validation(format!(
                "Lớp không hợp lệ: '{}'. Chỉ hỗ trợ lớp 6 đến lớp 12.",
                self.grade
            )));
        }

        let mut codes: Vec<String> = Vec::with_capacity(self.selected_nls.len());
        for raw in &self.selected_nls {
            let code = raw.trim();
            if !is_known_competency(code) {
                return Err(AppError::Validation(format!(
                    "Mã năng lực số không hợp lệ: '{code}'"
                )));
            }
            if !codes.iter().any(|c| c == code) {
                codes.push(code.to_string());
            }
        }
        self.selected_nls = codes;

        Ok(self)
    }
}
