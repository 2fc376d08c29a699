// Prompt templates for lesson-plan generation.
// Placeholders are `{name}` and are filled in one pass by `composer::fill_template`,
// so user text containing braces is never re-substituted.

/// Reference block describing the competency framework and its coding grammar.
pub const NLS_CONTEXT_REF: &str = "
TÀI LIỆU THAM CHIẾU (BẮT BUỘC DÙNG):
1. KHUNG NĂNG LỰC SỐ (TT 02/2025) & CV 3456.
QUY TẮC MÃ: [Lĩnh vực].[Thành phần].[Bậc]. Ví dụ: 1.1.CB1, 6.2.TC1.
";

/// Used when the teacher picked competency codes. Replace `{codes}`.
pub const NLS_SELECTED_TEMPLATE: &str =
    "BẮT BUỘC TÍCH HỢP TRỌNG TÂM các mã Năng lực số sau: {codes}.";

/// Used when no code was picked: the model infers them from the content.
pub const NLS_AUTO_INSTRUCTION: &str =
    "TỰ ĐỘNG PHÂN TÍCH nội dung và gán ít nhất 2 mã Năng lực số (NLS) phù hợp nhất theo TT 02/2025.";

/// Stands in for blank learning outcomes.
pub const YCCD_FALLBACK: &str = "Tự động xác định theo Chương trình GDPT 2018";

/// Header row of the two-column lesson-delivery table.
pub const ACTIVITY_TABLE_HEADER: &str = "| HOẠT ĐỘNG CỦA GV - HS | DỰ KIẾN SẢN PHẨM |";

/// Content placeholder for enhance mode when the legacy plan arrives as a PDF.
/// Replace `{file_name}`.
pub const PDF_CONTENT_PLACEHOLDER: &str =
    "(Đã tải lên file PDF: {file_name}. AI sẽ đọc trực tiếp nội dung từ file này)";

/// Create-mode prompt.
/// Replace: {subject}, {grade}, {lesson_name}, {textbook}, {duration}, {yccd},
///          {nls_instruction}, {content}, {nls_ref}, {table_header}
pub const CREATE_PROMPT_TEMPLATE: &str = r#"HÃY SOẠN MỘT GIÁO ÁN TOÀN DIỆN (CHUẨN 5512 VÀ NLS 2025)
Môn: {subject} | Lớp: {grade} | Bài: "{lesson_name}"
Bộ sách: {textbook} | Thời lượng: {duration}

YÊU CẦU CẦN ĐẠT (YCCĐ):
{yccd}

NĂNG LỰC SỐ:
{nls_instruction}

DỮ LIỆU ĐẦU VÀO: {content}
THAM CHIẾU NLS: {nls_ref}

YÊU CẦU CỤ THỂ:
1. BẮT ĐẦU từ phần thông tin hành chính (Trường, Tổ, Giáo viên, Bài học).
2. MỤC TIÊU: Năng lực đặc thù, Năng lực chung, Năng lực số (ghi rõ mã NLS), Phẩm chất.
3. THIẾT BỊ DẠY HỌC VÀ HỌC LIỆU: thiết bị, phần mềm, nền tảng số sử dụng.
4. TIẾN TRÌNH DẠY HỌC đủ 4 hoạt động: Hoạt động 1: Mở đầu; Hoạt động 2: Hình thành kiến thức; Hoạt động 3: Luyện tập; Hoạt động 4: Vận dụng. Trình bày bằng bảng Markdown 2 cột:
   {table_header}
5. HOẠT ĐỘNG 4 (VẬN DỤNG): Phải cực kỳ chi tiết như ảnh mẫu. Bao gồm: Bài toán thực tế liên quan, kịch bản yêu cầu HS giải ra giấy, chụp ảnh nộp qua Azota, GV nhận xét trực tiếp trên màn hình. Cột Sản phẩm phải có lời giải full và đáp số.
6. PHẦN KẾT: Có dòng ngày tháng năm và khu vực ký tên của Người soạn, Tổ trưởng chuyên môn."#;

/// Enhance-mode prompt: rebuild a legacy plan in full with the framework injected.
/// Replace: {content}, {nls_ref}, {table_header}
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"NHIỆM VỤ: TÁI TẠO LẠI HOÀN TOÀN BỘ GIÁO ÁN VÀ THÊM NLS THEO CHUẨN 5512.
HÃY VIẾT ĐẦY ĐỦ CHI TIẾT, KHÔNG TÓM TẮT.

CẤU TRÚC BẮT BUỘC:
1. Mục tiêu (Tích hợp NLS + Mã chuẩn xác)
2. Thiết bị dạy học
3. TIẾN TRÌNH DẠY HỌC (Bảng Markdown 2 cột):
   {table_header}
4. Đánh giá

DỮ LIỆU ĐẦU VÀO:
"""
{content}
"""

THAM CHIẾU NLS:
"""
{nls_ref}
"""
"#;
