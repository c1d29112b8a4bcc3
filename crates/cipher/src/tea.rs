//! TEA-family block transforms over 8-byte blocks (two `u32` words).

const DELTA: u32 = 0x9E37_79B9;
const XTEA_CYCLES: u32 = 32;
// XXTEA: 6 + 52/n rounds, with n = 2 words per block.
const XXTEA_ROUNDS: u32 = 6 + 52 / 2;

pub(crate) fn xtea_encipher(block: &mut [u32; 2], key: &[u32; 4]) {
    let [mut v0, mut v1] = *block;
    let mut sum: u32 = 0;
    for _ in 0..XTEA_CYCLES {
        v0 = v0.wrapping_add(
            ((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1) ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
        sum = sum.wrapping_add(DELTA);
        v1 = v1.wrapping_add(
            ((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0) ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
    }
    *block = [v0, v1];
}

pub(crate) fn xtea_decipher(block: &mut [u32; 2], key: &[u32; 4]) {
    let [mut v0, mut v1] = *block;
    let mut sum: u32 = DELTA.wrapping_mul(XTEA_CYCLES);
    for _ in 0..XTEA_CYCLES {
        v1 = v1.wrapping_sub(
            ((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0) ^ sum.wrapping_add(key[((sum >> 11) & 3) as usize]),
        );
        sum = sum.wrapping_sub(DELTA);
        v0 = v0.wrapping_sub(
            ((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1) ^ sum.wrapping_add(key[(sum & 3) as usize]),
        );
    }
    *block = [v0, v1];
}

#[inline]
fn mx(sum: u32, y: u32, z: u32, p: usize, e: u32, key: &[u32; 4]) -> u32 {
    (((z >> 5) ^ (y << 2)).wrapping_add((y >> 3) ^ (z << 4)))
        ^ ((sum ^ y).wrapping_add(key[(p & 3) ^ e as usize] ^ z))
}

pub(crate) fn xxtea_encipher(block: &mut [u32; 2], key: &[u32; 4]) {
    let mut sum: u32 = 0;
    let mut z = block[1];
    for _ in 0..XXTEA_ROUNDS {
        sum = sum.wrapping_add(DELTA);
        let e = (sum >> 2) & 3;
        let y = block[1];
        block[0] = block[0].wrapping_add(mx(sum, y, z, 0, e, key));
        z = block[0];
        let y = block[0];
        block[1] = block[1].wrapping_add(mx(sum, y, z, 1, e, key));
        z = block[1];
    }
}

pub(crate) fn xxtea_decipher(block: &mut [u32; 2], key: &[u32; 4]) {
    let mut sum: u32 = DELTA.wrapping_mul(XXTEA_ROUNDS);
    let mut y = block[0];
    for _ in 0..XXTEA_ROUNDS {
        let e = (sum >> 2) & 3;
        let z = block[0];
        block[1] = block[1].wrapping_sub(mx(sum, y, z, 1, e, key));
        y = block[1];
        let z = block[1];
        block[0] = block[0].wrapping_sub(mx(sum, y, z, 0, e, key));
        y = block[0];
        sum = sum.wrapping_sub(DELTA);
    }
}
