use super::Size2;

/// Zero padding around the spatial dims of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    /// Rows added above the image.
    pub top: usize,

    /// Rows added below the image.
    pub bottom: usize,

    /// Columns added on the left of the image.
    pub left: usize,

    /// Columns added on the right of the image.
    pub right: usize,
}

/// Computes the padding and the output size of a convolution in SAME mode.
///
/// `in_size` is `[height, width]`. The output size is `ceil(in / stride)` along
/// each axis. When the total padding along an axis is odd, the extra pixel goes
/// to the bottom (or right) side.
///
/// If the kernel is smaller than the stride, the padding is clamped at zero as
/// in TensorFlow, so the first sampled pixel is always `(0, 0)`. Passing the
/// negative amount to a zero-padding layer instead, as PyTorch's `ZeroPad2d`
/// allows, would crop the top-left border and shift the sampled pixels.
pub fn same_padding(in_size: [usize; 2], kernel: Size2, stride: Size2) -> (Padding, [usize; 2]) {
    let (k_h, k_w) = kernel.hw();
    let (s_h, s_w) = stride.hw();
    let (pad_h, out_h) = same_1d(in_size[0], k_h, s_h);
    let (pad_w, out_w) = same_1d(in_size[1], k_w, s_w);
    let padding = Padding {
        top: pad_h / 2,
        bottom: pad_h - pad_h / 2,
        left: pad_w / 2,
        right: pad_w - pad_w / 2,
    };

    (padding, [out_h, out_w])
}

fn same_1d(in_size: usize, kernel: usize, stride: usize) -> (usize, usize) {
    let out = (in_size + stride - 1) / stride;
    let pad = ((out - 1) * stride + kernel).saturating_sub(in_size);
    (pad, out)
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn test_same_padding_stride1() {
        let (padding, out) = same_padding([84, 84], Size2::Square(3), Size2::Square(1));
        assert_eq!(out, [84, 84]);
        assert_eq!(
            padding,
            Padding {
                top: 1,
                bottom: 1,
                left: 1,
                right: 1
            }
        );
    }

    #[test]
    fn test_same_padding_odd_total() {
        // out = ceil(84 / 4) = 21, pad = 20 * 4 + 8 - 84 = 4
        let (padding, out) = same_padding([84, 84], Size2::Square(8), Size2::Square(4));
        assert_eq!(out, [21, 21]);
        assert_eq!((padding.top, padding.bottom), (2, 2));

        // out = ceil(10 / 2) = 5, pad = 4 * 2 + 4 - 10 = 2 along h
        // out = ceil(10 / 3) = 4, pad = 3 * 3 + 4 - 10 = 3 along w
        let (padding, out) = same_padding([10, 10], Size2::Square(4), Size2::Rect(2, 3));
        assert_eq!(out, [5, 4]);
        assert_eq!((padding.top, padding.bottom), (1, 1));
        assert_eq!((padding.left, padding.right), (1, 2));
    }

    #[test]
    fn test_same_padding_kernel_smaller_than_stride() {
        let (padding, out) = same_padding([6, 7], Size2::Square(1), Size2::Square(4));
        assert_eq!(out, [2, 2]);
        assert_eq!(padding, Padding::default());
    }

    #[test]
    fn test_same_padding_rect_kernel() {
        let (padding, out) = same_padding([5, 9], Size2::Rect(3, 5), Size2::Square(1));
        assert_eq!(out, [5, 9]);
        assert_eq!((padding.top, padding.bottom), (1, 1));
        assert_eq!((padding.left, padding.right), (2, 2));
    }
}
