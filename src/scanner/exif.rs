use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFのGPSタグから (緯度, 経度) を取得
///
/// 南緯・西経は負の値にする。
pub fn extract_gps(path: &Path) -> Result<(f64, f64), Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    let latitude = exif
        .get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY)
        .and_then(degrees)
        .ok_or("No GPS latitude in EXIF")?;
    let longitude = exif
        .get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY)
        .and_then(degrees)
        .ok_or("No GPS longitude in EXIF")?;

    let lat_ref = exif
        .get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY)
        .and_then(hemisphere);
    let lng_ref = exif
        .get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY)
        .and_then(hemisphere);

    Ok((
        signed(latitude, lat_ref == Some(b'S')),
        signed(longitude, lng_ref == Some(b'W')),
    ))
}

/// 度・分・秒の有理数3つを10進度に変換
fn degrees(field: &exif::Field) -> Option<f64> {
    match &field.value {
        exif::Value::Rational(v) if v.len() >= 3 => {
            Some(v[0].to_f64() + v[1].to_f64() / 60.0 + v[2].to_f64() / 3600.0)
        }
        _ => None,
    }
}

fn hemisphere(field: &exif::Field) -> Option<u8> {
    match &field.value {
        exif::Value::Ascii(v) => v.first()?.first().copied(),
        _ => None,
    }
}

fn signed(value: f64, negative: bool) -> f64 {
    if negative {
        -value
    } else {
        value
    }
}
