use std::{env, fs::File, io};

use stream_press::{CompressWriter, DEFAULT_LEVEL};

fn main() {
    let mut args = env::args().skip(1);
    let path = args.next().expect("usage: pack <file> [level]");
    let level = args.next()
        .map(|l| l.parse().expect("level must be an integer"))
        .unwrap_or(DEFAULT_LEVEL);

    let mut input = File::open(&path).unwrap();
    let output = File::create(format!("{path}.z")).unwrap();

    let mut writer = CompressWriter::new();
    writer.open_with_level(output, level).unwrap();

    let copied = io::copy(&mut input, &mut writer).unwrap();
    writer.close().unwrap();

    println!("Compressed {copied} bytes into {path}.z");
}
