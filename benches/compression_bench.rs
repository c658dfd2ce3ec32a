use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stegano_container::bytes::crc32;
use stegano_container::compression;
use stegano_container::image_codec::CarrierImage;

fn bench_throughput(c: &mut Criterion) {
    let data = vec![0x5Au8; 1024 * 1024];

    c.bench_function("crc32_1mb", |b| b.iter(|| crc32(black_box(&data))));
    c.bench_function("gzip_compress_1mb", |b| {
        b.iter(|| compression::compress(black_box(&data)))
    });

    let compressed = compression::compress(&data);
    c.bench_function("gzip_decompress_1mb", |b| {
        b.iter(|| compression::decompress(black_box(&compressed)).unwrap())
    });

    let blob = vec![0xA5u8; 64 * 1024];
    c.bench_function("lsb_embed_depth1_64kb", |b| {
        b.iter(|| {
            let mut image = CarrierImage::new(512, 512, vec![0u8; 512 * 512 * 4]);
            image.embed(black_box(&blob), 1, false).unwrap();
        })
    });
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
