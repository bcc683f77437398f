//! Archive Module
//!
//! 出力フォルダのZIP化と、出力ルートの掃除を提供するモジュール。

use crate::error::ChargeSplitError;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// ディレクトリ直下の通常ファイルをZIPアーカイブにまとめる
///
/// サブディレクトリは含めません。エントリ名はファイル名のみで、名前順に並びます。
///
/// # 戻り値
///
/// * `Ok(Vec<u8>)` - ZIPアーカイブのバイト列
/// * `Err(ChargeSplitError::Io)` - ディレクトリやファイルを読めない場合
pub fn zip_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<u8>, ChargeSplitError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(9));

        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| ChargeSplitError::Zip(format!("Invalid file name: {}", path.display())))?;
            zip.start_file(name, options)?;
            zip.write_all(&fs::read(path)?)?;
        }

        zip.finish()?;
    }

    Ok(buffer)
}

/// ディレクトリをZIP化して指定パスに書き出す
pub fn write_zip<P: AsRef<Path>, Q: AsRef<Path>>(
    dir: P,
    dest: Q,
) -> Result<PathBuf, ChargeSplitError> {
    let bytes = zip_directory(dir)?;
    let dest = dest.as_ref();
    fs::write(dest, bytes)?;
    log::info!("Archive written: {}", dest.display());
    Ok(dest.to_path_buf())
}

/// 出力ルート配下のエントリをすべて削除する
///
/// ルート自体は残します。ルートが存在しない場合は何もしません。
///
/// # 戻り値
///
/// 削除したエントリ数
pub fn clear_output_root<P: AsRef<Path>>(root: P) -> Result<usize, ChargeSplitError> {
    let root = root.as_ref();
    if !root.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }

    log::info!("Output directory cleared: {}", root.display());
    Ok(removed)
}
