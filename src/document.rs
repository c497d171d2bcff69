//! Document Builder Module
//!
//! 抽出したレコードを固定スキーマのXML分類子ドキュメントに変換するモジュール。
//!
//! ヘッダーブロック（分類子ID、名称、5つのフィールド名）に続いて、
//! レコードごとに`custom_classif_row`要素を出力します。各行には新しく生成した
//! v4 UUIDが`isn_node`として付与され、親ノードは常にnilです（階層なし）。
//! テキストはquick-xmlによりエスケープされます。

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use uuid::Uuid;

use crate::api::{ClassifierSchema, FIELD_COUNT};
use crate::error::ClassifError;
use crate::extract::ClassifRecord;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// レコードから分類子ドキュメントを生成する
///
/// 行IDは呼び出しごとに新しく生成されるため、同じ入力でも出力は一致しません。
pub fn build_document(
    records: &[ClassifRecord],
    schema: &ClassifierSchema,
) -> Result<String, ClassifError> {
    let mut buffer = Vec::new();
    write_document(&mut buffer, records, schema, Uuid::new_v4)?;

    String::from_utf8(buffer)
        .map_err(|e| ClassifError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// 分類子ドキュメントをライターに書き出す
///
/// # 引数
///
/// * `output` - 出力先
/// * `records` - 出力するレコード
/// * `schema` - 分類子スキーマ
/// * `next_id` - 行IDの生成関数
pub(crate) fn write_document<W, F>(
    output: W,
    records: &[ClassifRecord],
    schema: &ClassifierSchema,
    mut next_id: F,
) -> Result<(), ClassifError>
where
    W: Write,
    F: FnMut() -> Uuid,
{
    let mut writer = Writer::new_with_indent(output, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("ClassifCard")
            .with_attributes([("xmlns:xsd", XSD_NAMESPACE), ("xmlns:xsi", XSI_NAMESPACE)]),
    ))?;

    write_text_element(&mut writer, "TableId", &schema.table_id)?;
    write_header(&mut writer, schema)?;

    writer.write_event(Event::Start(BytesStart::new("CustomRows")))?;
    for record in records {
        write_row(&mut writer, record, next_id())?;
    }
    writer.write_event(Event::End(BytesEnd::new("CustomRows")))?;

    writer.write_event(Event::End(BytesEnd::new("ClassifCard")))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_header<W: Write>(
    writer: &mut Writer<W>,
    schema: &ClassifierSchema,
) -> Result<(), ClassifError> {
    writer.write_event(Event::Start(BytesStart::new("Custom")))?;
    write_text_element(writer, "isn_classif", &schema.classifier_id)?;
    write_text_element(writer, "name", &schema.name)?;
    write_text_element(writer, "field_count", &FIELD_COUNT.to_string())?;

    writer.write_event(Event::Start(BytesStart::new("fields")))?;
    for (index, name) in schema.field_names.iter().enumerate() {
        write_text_element(writer, &format!("name{}", index), name)?;
    }
    writer.write_event(Event::End(BytesEnd::new("fields")))?;

    write_text_element(writer, "is_hierarchical", "false")?;
    writer.write_event(Event::End(BytesEnd::new("Custom")))?;
    Ok(())
}

fn write_row<W: Write>(
    writer: &mut Writer<W>,
    record: &ClassifRecord,
    id: Uuid,
) -> Result<(), ClassifError> {
    writer.write_event(Event::Start(BytesStart::new("custom_classif_row")))?;
    write_text_element(writer, "isn_node", &id.to_string())?;
    writer
        .create_element("isn_parent_node")
        .with_attribute(("xsi:nil", "true"))
        .write_empty()?;
    write_text_element(writer, "is_parent", "false")?;

    // フィールドの順序はスキーマのフィールド名と対応する
    let fields = [
        &record.department_code,
        &record.department_name,
        &record.service_code,
        &record.service_name,
        &record.code_frgu,
    ];
    for (index, value) in fields.iter().enumerate() {
        write_text_element(writer, &format!("field{}", index), value)?;
    }

    writer.write_event(Event::End(BytesEnd::new("custom_classif_row")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), ClassifError> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}
