//! 表格导入导出
//!
//! `.xlsx` 使用 calamine 读取，其余按 CSV 处理；导出统一生成 xlsx。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use calamine::{Reader, Xlsx};
use futures_util::StreamExt;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashMap;
use std::io::Cursor;

use crate::config::AppConfig;
use crate::errors::CampusError;
use crate::models::{ApiResponse, ErrorCode};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 导入解析错误
#[derive(Debug)]
pub enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
    TooManyRows(usize),
}

impl ImportParseError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile | Self::TooManyRows(_) => ErrorCode::ImportFileDataInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("Missing required column: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "The file contains no data rows".to_string(),
            Self::TooManyRows(max) => format!("At most {max} rows can be imported at once"),
        }
    }
}

/// 一行数据，按小写表头索引
#[derive(Debug, Clone)]
pub struct SheetRow {
    /// 1 起始，含表头行
    pub row_num: usize,
    cells: HashMap<String, String>,
}

impl SheetRow {
    /// 读取去空白后的非空单元格
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(&column.to_lowercase())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// 单元格原值（允许为空串）
    pub fn raw(&self, column: &str) -> &str {
        self.cells
            .get(&column.to_lowercase())
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// 数值单元格：缺失为 Ok(None)，无法解析为 Err
    pub fn number(&self, column: &str) -> Result<Option<f64>, String> {
        match self.get(column) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("'{v}' is not a number")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sheet {
    /// 原始表头（保持列顺序）
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(column))
    }

    pub fn require_columns(&self, columns: &[&str]) -> Result<(), ImportParseError> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(ImportParseError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// `records` 中每项为 (表格中的实际行号, 单元格)
    fn from_records(
        headers: Vec<String>,
        records: Vec<(usize, Vec<String>)>,
        max_rows: usize,
    ) -> Result<Self, ImportParseError> {
        let headers = disambiguate_headers(headers);
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportParseError::EmptyFile);
        }
        let keys: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let rows: Vec<SheetRow> = records
            .into_iter()
            // 跳过整行空白
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(row_num, cells)| SheetRow {
                row_num,
                cells: keys
                    .iter()
                    .cloned()
                    .zip(cells.into_iter().chain(std::iter::repeat(String::new())))
                    .collect(),
            })
            .collect();

        if rows.is_empty() {
            return Err(ImportParseError::EmptyFile);
        }
        if rows.len() > max_rows {
            return Err(ImportParseError::TooManyRows(max_rows));
        }

        Ok(Self { headers, rows })
    }
}

/// 重复表头追加 ` (2)`、` (3)` 后缀，保证每列都能单独取到
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|h| {
            let h = h.trim().to_string();
            if h.is_empty() {
                return h;
            }
            let count = seen.entry(h.to_lowercase()).or_insert(0);
            *count += 1;
            if *count == 1 {
                h
            } else {
                format!("{h} ({count})")
            }
        })
        .collect()
}

/// 按文件名选择解析方式
pub fn parse_sheet(
    data: &[u8],
    file_name: &str,
    max_rows: usize,
) -> Result<Sheet, ImportParseError> {
    if file_name.to_lowercase().ends_with(".xlsx") {
        parse_xlsx(data, max_rows)
    } else {
        parse_csv(data, max_rows)
    }
}

fn parse_csv(data: &[u8], max_rows: usize) -> Result<Sheet, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    // 按字节读取，非 UTF-8 内容替换为 U+FFFD，交由逐行校验处理
    let headers: Vec<String> = rdr
        .byte_headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read header: {e}")))?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect();

    let mut records = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("Failed to parse row {}: {e}", i + 2))
        })?;
        let row_num = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        let cells = record
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        records.push((row_num, cells));
    }

    Sheet::from_records(headers, records, max_rows)
}

fn parse_xlsx(data: &[u8], max_rows: usize) -> Result<Sheet, ImportParseError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to open xlsx: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportParseError::ParseFailed("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportParseError::ParseFailed(format!("Failed to read sheet: {e}")))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or(ImportParseError::EmptyFile)?
        .iter()
        .map(|c| c.to_string())
        .collect();

    // 使用区域可能不从 A1 开始，行号按工作表实际位置计算
    let header_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let records = rows_iter
        .enumerate()
        .map(|(i, row)| (header_row + i + 2, row.iter().map(|c| c.to_string()).collect()))
        .collect();

    Sheet::from_records(headers, records, max_rows)
}

/// 读取 multipart 中名为 `file` 的字段，返回 (内容, 文件名)
pub async fn read_file_from_multipart(payload: &mut Multipart) -> Result<(Vec<u8>, String), String> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to read field: {e}"))?;

        if field.name().map(|n| n == "file").unwrap_or(false) {
            if let Some(content_disposition) = field.content_disposition() {
                file_name = content_disposition
                    .get_filename()
                    .unwrap_or("upload.csv")
                    .to_string();
            }

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("Failed to read data: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_bytes.is_empty() {
        return Err("No file field found".to_string());
    }

    Ok((file_bytes, file_name))
}

/// 读取上传文件并解析为表格，失败时给出 400 响应
pub async fn read_import_sheet(
    payload: &mut Multipart,
    required_columns: &[&str],
) -> Result<Sheet, HttpResponse> {
    let (data, file_name) = read_file_from_multipart(payload).await.map_err(|e| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            format!("Failed to read file: {e}"),
        ))
    })?;

    let max_rows = AppConfig::get().upload.max_import_rows;
    let sheet = parse_sheet(&data, &file_name, max_rows)
        .and_then(|sheet| sheet.require_columns(required_columns).map(|_| sheet))
        .map_err(|e| {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(e.error_code(), e.message()))
        })?;

    tracing::debug!("Parsed import file {} with {} rows", file_name, sheet.rows.len());
    Ok(sheet)
}

/// 导出单元格
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// 生成单工作表 xlsx
pub fn build_xlsx(
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<Cell>],
) -> Result<Vec<u8>, CampusError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, col as u16, s)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, col as u16, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// xlsx 下载响应
pub fn xlsx_attachment(buffer: Vec<u8>, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_headers_are_case_insensitive() {
        let data = b"\xef\xbb\xbfUSN,Course Code,Marks\n1rv21cs001, cs501 ,78\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        assert!(sheet.require_columns(&["usn", "COURSE CODE", "Marks"]).is_ok());
        let row = &sheet.rows[0];
        assert_eq!(row.row_num, 2);
        assert_eq!(row.get("course code"), Some("cs501"));
        assert_eq!(row.number("Marks"), Ok(Some(78.0)));
    }

    #[test]
    fn test_missing_column_and_blank_cells() {
        let data = b"USN,Marks\n1RV21CS001,\n1RV21CS002,abc\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        match sheet.require_columns(&["USN", "Course Code"]) {
            Err(ImportParseError::MissingColumn(c)) => assert_eq!(c, "Course Code"),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(sheet.rows[0].get("Marks"), None);
        assert_eq!(sheet.rows[0].number("Marks"), Ok(None));
        assert!(sheet.rows[1].number("Marks").is_err());
    }

    #[test]
    fn test_row_limit_and_empty_file() {
        let data = b"USN\nA\nB\nC\n";
        assert!(matches!(
            parse_sheet(data, "x.csv", 2),
            Err(ImportParseError::TooManyRows(2))
        ));
        assert!(matches!(
            parse_sheet(b"USN\n", "x.csv", 2),
            Err(ImportParseError::EmptyFile)
        ));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = b"USN,Name,CGPA\n1RV21CS001,Asha\n";
        let sheet = parse_sheet(data, "students.csv", 10).unwrap();
        assert_eq!(sheet.rows[0].get("Name"), Some("Asha"));
        assert_eq!(sheet.rows[0].raw("CGPA"), "");
    }

    #[test]
    fn test_invalid_utf8_row_does_not_abort_import() {
        let data = b"USN,Marks\n1RV21CS001,70\n1RV21CS002,80\n1RV21CS\xff03,90\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1].get("USN"), Some("1RV21CS002"));
        assert_eq!(sheet.rows[2].row_num, 4);
        assert_eq!(sheet.rows[2].get("USN"), Some("1RV21CS\u{fffd}03"));
        assert_eq!(sheet.rows[2].number("Marks"), Ok(Some(90.0)));
    }

    #[test]
    fn test_duplicate_headers_keep_every_column() {
        let data = b"USN,2025-01-06,2025-01-06,2025-01-07\nA,P,A,P\n";
        let sheet = parse_sheet(data, "attendance.csv", 10).unwrap();
        assert_eq!(
            sheet.headers,
            vec!["USN", "2025-01-06", "2025-01-06 (2)", "2025-01-07"]
        );
        let row = &sheet.rows[0];
        assert_eq!(row.raw("2025-01-06"), "P");
        assert_eq!(row.raw("2025-01-06 (2)"), "A");
        assert_eq!(row.raw("2025-01-07"), "P");
    }

    #[test]
    fn test_csv_row_numbers_follow_file_lines() {
        let data = b"USN,Marks\n1RV21CS001,70\n,\n1RV21CS002,80\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_num, 2);
        assert_eq!(sheet.rows[1].row_num, 4);
    }

    #[test]
    fn test_xlsx_row_numbers_follow_sheet_position() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(2, 0, "USN").unwrap();
        worksheet.write_string(3, 0, "1RV21CS001").unwrap();
        let buffer = workbook.save_to_buffer().unwrap();

        let sheet = parse_sheet(&buffer, "offset.xlsx", 10).unwrap();
        assert_eq!(sheet.rows[0].row_num, 4);
        assert_eq!(sheet.rows[0].get("USN"), Some("1RV21CS001"));
    }

    #[test]
    fn test_xlsx_written_sheet_is_readable() {
        let rows = vec![vec![Cell::from("1RV21CS001"), Cell::from(42.5)]];
        let buffer = build_xlsx("Marks", &["USN", "Marks"], &rows).unwrap();
        let sheet = parse_sheet(&buffer, "export.xlsx", 10).unwrap();
        assert_eq!(sheet.headers, vec!["USN", "Marks"]);
        assert_eq!(sheet.rows[0].get("usn"), Some("1RV21CS001"));
        assert_eq!(sheet.rows[0].number("marks"), Ok(Some(42.5)));
    }
}
