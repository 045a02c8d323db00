#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A slice of the classic sample book catalog
pub const SAMPLE_CATALOG: &str = r#"<?xml version="1.0"?>
<catalog>
   <book id="bk101">
      <author>Gambardella, Matthew</author>
      <title>XML Developer's Guide</title>
      <genre>Computer</genre>
      <price>44.95</price>
      <publish_date>2000-10-01</publish_date>
      <description>An in-depth look at creating applications 
      with XML.</description>
   </book>
   <book id="bk102">
      <author>Ralls, Kim</author>
      <title>Midnight Rain</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2000-12-16</publish_date>
      <description>A former architect battles corporate zombies, 
      an evil sorceress, and her own childhood to become queen 
      of the world.</description>
   </book>
   <book id="bk103">
      <author>Corets, Eva</author>
      <title>Maeve Ascendant</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2000-11-17</publish_date>
      <description>After the collapse of a nanotechnology 
      society in England, the young survivors lay the 
      foundation for a new society.</description>
   </book>
   <book id="bk105">
      <author>Corets, Eva</author>
      <title>The Sundered Grail</title>
      <genre>Fantasy</genre>
      <price>5.95</price>
      <publish_date>2001-09-10</publish_date>
      <description>The two daughters of Maeve, half-sisters, 
      battle one another for control of England. Sequel to 
      Oberon's Legacy.</description>
   </book>
   <book id="bk110">
      <author>O&apos;Brien, Tim</author>
      <title>Microsoft .NET: The Programming Bible</title>
      <genre>Computer</genre>
      <price>36.95</price>
      <publish_date>2000-12-09</publish_date>
      <description>Microsoft's .NET initiative is explored in 
      detail in this deep programmer's reference.</description>
   </book>
</catalog>
"#;

/// A catalog whose second book lacks its price
pub const CATALOG_MISSING_PRICE: &str = r#"<?xml version="1.0"?>
<catalog>
   <book id="bk201">
      <author>Knorr, Stefan</author>
      <genre>Horror</genre>
      <price>4.95</price>
      <publish_date>2000-12-06</publish_date>
      <description>An anthology of horror stories.</description>
   </book>
   <book id="bk202">
      <author>Kress, Peter</author>
      <genre>Science Fiction</genre>
      <publish_date>2000-11-02</publish_date>
      <description>After an inadvertant trip through a Heisenberg 
      Uncertainty Device, James Salway discovers the problems 
      of being quantum.</description>
   </book>
</catalog>
"#;

/// Write `content` into a fresh temporary directory and return both
pub fn write_catalog(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// The sample catalog on disk
pub fn sample_catalog_file() -> (TempDir, PathBuf) {
    write_catalog("books.xml", SAMPLE_CATALOG)
}
