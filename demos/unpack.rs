use std::{env, fs::File, io};

use stream_press::DecompressReader;

fn main() {
    let path = env::args().nth(1).expect("usage: unpack <file.z>");
    let restored = path.strip_suffix(".z").expect("expected a .z file");

    let input = File::open(&path).unwrap();
    let mut output = File::create(restored).unwrap();

    let mut reader = DecompressReader::new();
    reader.open(input).unwrap();

    let copied = io::copy(&mut reader, &mut output).unwrap();
    reader.close();

    println!("Decompressed {copied} bytes into {restored}");
}
